use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("signal too short: need {needed} samples, have {available}")]
    SignalTooShort { needed: usize, available: usize },

    #[error("decay only reaches {reached_db:.1} dB, cannot fit down to {needed_db:.1} dB")]
    DecayTooShallow { reached_db: f32, needed_db: f32 },

    #[error("signal is silent")]
    Silent,

    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}
