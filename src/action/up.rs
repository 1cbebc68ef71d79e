//! `fermyon up`: write the instance template and start the VM.

use crate::error::FermyonError;
use crate::runner::{Runner, Streams, argv, shell_out};
use crate::template;

use super::ActionContext;

pub async fn run<R: Runner>(
    ctx: &ActionContext<'_>,
    instance: &str,
    runner: &R,
    streams: &mut Streams<'_>,
) -> Result<(), FermyonError> {
    let file = template::write_template(ctx.lima_dir, instance, ctx.template)?;
    tracing::info!(instance, template = %file.display(), "starting instance");

    let args = argv([
        ctx.settings.supervisor.as_str(),
        "start",
        "--name",
        instance,
    ]);
    shell_out(runner, &args, streams).await?;
    Ok(())
}
