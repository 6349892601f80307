use thiserror::Error as ThisError;

/// Errors returned by the bundled solvers.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("state has {actual} entries but the solver was set up for {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[cfg(feature = "ode-solvers")]
    #[error(transparent)]
    Integration(#[from] ode_solvers::dop_shared::IntegrationError),
}

pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<(), Error> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, actual })
    }
}
