use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropahError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("parameter '{name}' out of range: {value}")]
    Range { name: &'static str, value: f64 },

    #[error("invalid radio climate code {0}")]
    Climate(i32),

    #[error("invalid polarization code {0}")]
    Polarization(i32),
}
