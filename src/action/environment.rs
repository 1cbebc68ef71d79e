//! `fermyon environment`: print the exports that point spin at the VM.

use crate::error::FermyonError;
use crate::runner::Streams;

pub const EXPORTS: &str = "
Adding these variables to your shell environment will enable the spin CLI to target your local development VM.

export HIPPO_URL=http://hippo.local.fermyon.link/
export BINDLE_URL=http://bindle.local.fermyon.link/v1
";

pub fn run(streams: &mut Streams<'_>) -> Result<(), FermyonError> {
    // A closed stdout is not worth failing over.
    if let Err(e) = streams.print(EXPORTS) {
        tracing::debug!(error = %e, "could not print environment");
    }
    Ok(())
}
