//! `fermyon down`: stop the VM. Whether it is running is the supervisor's
//! business.

use crate::config::Settings;
use crate::error::FermyonError;
use crate::runner::{Runner, Streams, argv, shell_out};

pub async fn run<R: Runner>(
    settings: &Settings,
    instance: &str,
    runner: &R,
    streams: &mut Streams<'_>,
) -> Result<(), FermyonError> {
    tracing::info!(instance, "stopping instance");
    let args = argv([settings.supervisor.as_str(), "stop", instance]);
    shell_out(runner, &args, streams).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::FakeRunner;

    #[tokio::test]
    async fn stops_named_instance() {
        let runner = FakeRunner::default();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        run(
            &Settings::default(),
            "spin",
            &runner,
            &mut Streams::new(&mut out, &mut err),
        )
        .await
        .unwrap();
        assert_eq!(runner.calls(), vec![argv(["limactl", "stop", "spin"])]);
    }

    #[tokio::test]
    async fn second_stop_surfaces_supervisor_error() {
        let runner = FakeRunner::default();
        runner.push_ok("");
        runner.push_exit(1, "FATA[0000] expected status \"Running\", got \"Stopped\"\n");
        let settings = Settings::default();
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let first = run(&settings, "spin", &runner, &mut Streams::new(&mut out, &mut err)).await;
        assert!(first.is_ok());
        let second = run(&settings, "spin", &runner, &mut Streams::new(&mut out, &mut err)).await;

        assert!(matches!(
            second,
            Err(FermyonError::CommandFailed { code: Some(1), .. })
        ));
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "FATA[0000] expected status \"Running\", got \"Stopped\"\n"
        );
        assert_eq!(runner.calls().len(), 2);
    }
}
