use crate::utils::error::Result;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
