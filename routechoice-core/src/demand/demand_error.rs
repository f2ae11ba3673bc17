#[derive(thiserror::Error, Debug)]
pub enum DemandError {
    #[error("demand column {0:?} already exists")]
    DuplicateDemandColumn(String),
    #[error("demand column {0:?} expected {1:?} values but got a different numeric type")]
    TypeMismatch(String, &'static str),
}
