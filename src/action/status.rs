//! `fermyon status`: diagnostics for the VM and the services inside it.
//!
//! Probes run one after another and stop at the first failure, so a
//! missing tool early in the list hides the results of the later ones.

use crate::config::Settings;
use crate::error::FermyonError;
use crate::runner::{Runner, Streams, argv, shell_out};

pub const HEALTH_URL: &str = "http://hippo.local.fermyon.link/healthz";

/// A titled diagnostic command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub title: &'static str,
    pub argv: Vec<String>,
}

/// The probes in the order they are reported.
pub fn probes(settings: &Settings, instance: &str) -> Vec<Probe> {
    let sup = settings.supervisor.as_str();
    vec![
        Probe {
            title: "Lima VM List",
            argv: argv([sup, "list"]),
        },
        Probe {
            title: "Consul Member Status",
            argv: argv([sup, "shell", instance, "consul", "members", "status"]),
        },
        Probe {
            title: "Nomad Job Status",
            argv: argv([sup, "shell", instance, "nomad", "status"]),
        },
        Probe {
            title: "Hippo Health Endpoint",
            argv: argv([settings.http_client.as_str(), HEALTH_URL]),
        },
    ]
}

pub async fn run<R: Runner>(
    settings: &Settings,
    instance: &str,
    runner: &R,
    streams: &mut Streams<'_>,
) -> Result<(), FermyonError> {
    for (i, probe) in probes(settings, instance).iter().enumerate() {
        let sep = if i == 0 { "" } else { "\n" };
        streams.print(&format!("{sep}{}:\n", probe.title))?;
        shell_out(runner, &probe.argv, streams).await.inspect_err(|e| {
            tracing::debug!(probe = probe.title, error = %e, "status probe failed");
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::FakeRunner;

    #[tokio::test]
    async fn reports_all_probes_in_order() {
        let runner = FakeRunner::default();
        runner.push_ok("NAME  STATUS\nspin  Running\n");
        runner.push_ok("Node  Status\nlima-spin  alive\n");
        runner.push_ok("ID  Type  Status\nhippo  service  running\n");
        runner.push_ok("Healthy");
        let (mut out, mut err) = (Vec::new(), Vec::new());

        run(
            &Settings::default(),
            "spin",
            &runner,
            &mut Streams::new(&mut out, &mut err),
        )
        .await
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Lima VM List:\n\
             NAME  STATUS\nspin  Running\n\
             \nConsul Member Status:\n\
             Node  Status\nlima-spin  alive\n\
             \nNomad Job Status:\n\
             ID  Type  Status\nhippo  service  running\n\
             \nHippo Health Endpoint:\n\
             Healthy"
        );
        assert_eq!(
            runner.calls(),
            vec![
                argv(["limactl", "list"]),
                argv(["limactl", "shell", "spin", "consul", "members", "status"]),
                argv(["limactl", "shell", "spin", "nomad", "status"]),
                argv(["curl", "http://hippo.local.fermyon.link/healthz"]),
            ]
        );
    }

    #[tokio::test]
    async fn first_failure_stops_remaining_probes() {
        let runner = FakeRunner::default();
        runner.push_err(FermyonError::CommandNotFound {
            program: "limactl".into(),
        });
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let result = run(
            &Settings::default(),
            "spin",
            &runner,
            &mut Streams::new(&mut out, &mut err),
        )
        .await;

        assert!(matches!(
            result,
            Err(FermyonError::CommandNotFound { ref program }) if program == "limactl"
        ));
        assert_eq!(runner.calls(), vec![argv(["limactl", "list"])]);
        assert_eq!(String::from_utf8(out).unwrap(), "Lima VM List:\n");
    }

    #[tokio::test]
    async fn failing_probe_code_is_propagated() {
        let runner = FakeRunner::default();
        runner.push_ok("spin  Running\n");
        runner.push_exit(5, "consul: command not found\n");
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let result = run(
            &Settings::default(),
            "spin",
            &runner,
            &mut Streams::new(&mut out, &mut err),
        )
        .await;

        assert_eq!(result.unwrap_err().exit_code(), 5);
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(err, b"consul: command not found\n");
        assert!(!String::from_utf8(out).unwrap().contains("Nomad"));
    }

    #[test]
    fn probes_follow_instance_and_tools() {
        let settings = Settings {
            http_client: "wget".into(),
            ..Settings::default()
        };
        let probes = probes(&settings, "dev");
        assert_eq!(probes[1].argv[2], "dev");
        assert_eq!(probes[2].argv[2], "dev");
        assert_eq!(probes[3].argv, argv(["wget", HEALTH_URL]));
    }
}
