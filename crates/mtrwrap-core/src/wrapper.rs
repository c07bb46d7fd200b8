use crate::config::Config;
use crate::error::{Error, Result};
use crate::result::{Status, TraceResult};
use crate::runner::{ProcessRunner, Runner};
use crate::types::PacketSize;
use crate::{addr, command};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::instrument;

/// Run `mtr` against a single target and parse its report.
///
/// See the [`crate`] documentation for more information.
///
/// Note that this type is cheaply cloneable and holds no mutable state, so a
/// single wrapper may run any number of concurrent traces.
pub struct MtrWrapper<R = ProcessRunner> {
    inner: Arc<WrapperInner<R>>,
}

struct WrapperInner<R> {
    target: String,
    config: Config,
    runner: R,
}

impl MtrWrapper {
    /// Create a `MtrWrapper` which spawns the probing utility as a child
    /// process.
    ///
    /// The target is not validated until a trace is run.  Use the
    /// [`crate::Builder`] type to have the config validated.
    #[must_use]
    pub fn new(target: impl Into<String>, config: Config) -> Self {
        Self::with_runner(target, config, ProcessRunner)
    }
}

impl<R: Runner + Sync> MtrWrapper<R> {
    /// Create a `MtrWrapper` which runs the probing utility with a custom
    /// [`Runner`].
    #[must_use]
    pub fn with_runner(target: impl Into<String>, config: Config, runner: R) -> Self {
        Self {
            inner: Arc::new(WrapperInner {
                target: target.into(),
                config,
                runner,
            }),
        }
    }

    /// Run a single trace.
    ///
    /// The target must be an IPv4 or IPv6 literal, it is checked before
    /// anything is run.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTarget`] if the target is not an IP literal.
    /// - [`Error::SpawnFailed`] if the probing utility could not be started.
    /// - [`Error::CaptureFailed`] if its output or exit status could not be
    ///   collected.
    /// - [`Error::ProbeFailed`] if it exited with a non-zero code, carrying
    ///   the failed [`TraceResult`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn run() -> anyhow::Result<()> {
    /// use mtrwrap_core::Builder;
    ///
    /// let wrapper = Builder::new("192.0.2.1").build()?;
    /// let result = wrapper.traceroute().await?;
    /// for hop in &result.as_report().unwrap().hops {
    ///     println!("{} {} {}", hop.hop_id, hop.host, hop.avg);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(target = %self.inner.target), level = "debug")]
    pub async fn traceroute(&self) -> Result<TraceResult> {
        let target = self.target();
        let family =
            addr::classify(target).ok_or_else(|| Error::InvalidTarget(String::from(target)))?;
        let args = command::build(family, &self.inner.config, target);
        tracing::debug!(program = self.program(), %family, ?args, "running probe");
        let completion = self.inner.runner.run(self.program(), &args).await?;
        let result = TraceResult::from_completion(args, completion);
        tracing::debug!(
            status = %result.status,
            code = %result.code,
            elapsed = ?result.elapsed,
            "probe completed"
        );
        match result.status {
            Status::Success => Ok(result),
            Status::Failed => Err(Error::ProbeFailed(Box::new(result))),
        }
    }

    /// Run a single trace and pass the outcome to `func`.
    ///
    /// The callback sees exactly the outcome which is then returned.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn run() -> anyhow::Result<()> {
    /// use mtrwrap_core::Builder;
    ///
    /// let wrapper = Builder::new("2001:db8::1").build()?;
    /// let _result = wrapper
    ///     .traceroute_with(|outcome| println!("{:?}", outcome))
    ///     .await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn traceroute_with<F: FnOnce(&Result<TraceResult>) + Send>(
        &self,
        func: F,
    ) -> Result<TraceResult> {
        let outcome = self.traceroute().await;
        func(&outcome);
        outcome
    }

    /// The target of the trace.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.inner.target
    }

    /// The probe packet size.
    #[must_use]
    pub fn packet_len(&self) -> PacketSize {
        self.inner.config.packet_len
    }

    /// Whether hop addresses may be resolved to hostnames.
    #[must_use]
    pub fn resolve_dns(&self) -> bool {
        self.inner.config.resolve_dns
    }

    /// The probing utility executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.inner.config.program
    }
}

impl<R: Runner + Send + Sync + 'static> MtrWrapper<R> {
    /// Spawn a trace with a completion handler on the tokio runtime.
    ///
    /// This method immediately returns the [`MtrWrapper`] and a handle to the
    /// task, which resolves to the same outcome `func` was called with.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn run() -> anyhow::Result<()> {
    /// use mtrwrap_core::Builder;
    ///
    /// let (_wrapper, handle) = Builder::new("192.0.2.1")
    ///     .build()?
    ///     .spawn_with(|outcome| println!("done: {}", outcome.is_ok()));
    /// let _result = handle.await??;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn_with<F: FnOnce(&Result<TraceResult>) + Send + 'static>(
        self,
        func: F,
    ) -> (Self, JoinHandle<Result<TraceResult>>) {
        let wrapper = self.clone();
        let handle = tokio::spawn(async move { wrapper.traceroute_with(func).await });
        (self, handle)
    }
}

impl<R> Clone for MtrWrapper<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Debug for MtrWrapper<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MtrWrapper")
            .field("target", &self.inner.target)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Failure;
    use crate::runner::Completion;
    use crate::types::ExitCode;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use test_case::test_case;

    const HOPS: &str = "\
HOST: probe-host                 Loss%   Snt   Drop   Rcv   Last   Best  Avg  Wrst  Jttr  Javg  Jmax  Jint
  1.|-- 10.0.0.1                   0.0%    10    0    10   0.5  0.3  0.4  0.6  0.1  0.1  0.2  0.3
  2.|-- 192.0.2.254               10.0%    10    1     9  12.1 11.0 11.8 13.4  1.1  0.7  2.0  1.9
  3.|-- 198.51.100.1               0.0%    10    0    10  20.4 19.8 20.1 21.0  0.4  0.3  1.1  0.5
";

    type RunFailure = (fn(io::Error) -> Error, io::ErrorKind);

    /// Returns a canned completion and records every invocation.
    #[derive(Debug)]
    struct CannedRunner {
        completion: std::result::Result<Completion, RunFailure>,
        calls: AtomicUsize,
        last: Mutex<Option<(String, Vec<String>)>>,
    }

    impl CannedRunner {
        fn new(code: i32, stdout: &str, stderr: &str) -> Self {
            Self {
                completion: Ok(Completion {
                    code: ExitCode(code),
                    stdout: String::from(stdout),
                    stderr: String::from(stderr),
                    elapsed: Duration::from_millis(250),
                }),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        fn failing(variant: fn(io::Error) -> Error, kind: io::ErrorKind) -> Self {
            Self {
                completion: Err((variant, kind)),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }
    }

    impl Runner for CannedRunner {
        async fn run(&self, program: &str, args: &[String]) -> Result<Completion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((String::from(program), args.to_vec()));
            match &self.completion {
                Ok(completion) => Ok(completion.clone()),
                Err((variant, kind)) => Err(variant(io::Error::from(*kind))),
            }
        }
    }

    fn wrapper(target: &str, runner: CannedRunner) -> MtrWrapper<CannedRunner> {
        MtrWrapper::with_runner(target, Config::default(), runner)
    }

    #[tokio::test]
    async fn test_traceroute_success() -> anyhow::Result<()> {
        let wrapper = wrapper("192.0.2.1", CannedRunner::new(0, HOPS, ""));
        let result = wrapper.traceroute().await?;
        assert_eq!(Status::Success, result.status);
        assert_eq!(ExitCode(0), result.code);
        assert_eq!(Duration::from_millis(250), result.elapsed);
        let report = result.as_report().unwrap();
        assert_eq!(3, report.hops.len());
        assert_eq!(1, report.skipped);
        assert_eq!("198.51.100.1", report.hops[2].host);
        Ok(())
    }

    #[tokio::test]
    async fn test_traceroute_runs_program_with_args() -> anyhow::Result<()> {
        let wrapper = wrapper("192.0.2.1", CannedRunner::new(0, HOPS, ""));
        let result = wrapper.traceroute().await?;
        let (program, args) = wrapper.inner.runner.last.lock().unwrap().clone().unwrap();
        assert_eq!("mtr", program);
        assert_eq!(
            command::build(addr::AddrFamily::Ipv4, &Config::default(), "192.0.2.1"),
            args
        );
        assert_eq!(args, result.args);
        Ok(())
    }

    #[tokio::test]
    async fn test_traceroute_probe_failed() {
        let wrapper = wrapper(
            "192.0.2.1",
            CannedRunner::new(1, HOPS, "mtr: permission denied"),
        );
        let err = wrapper.traceroute().await.unwrap_err();
        let Error::ProbeFailed(result) = err else {
            panic!("expected ProbeFailed");
        };
        assert_eq!(Status::Failed, result.status);
        assert_eq!(ExitCode(1), result.code);
        assert_eq!(
            Some(&Failure {
                raw: String::from("mtr: permission denied")
            }),
            result.as_failure()
        );
    }

    #[test_case("example.com"; "hostname")]
    #[test_case(""; "empty")]
    #[test_case("999.1.1.1"; "octet out of range")]
    #[test_case("192.0.2.1 "; "trailing space")]
    #[tokio::test]
    async fn test_traceroute_invalid_target_does_not_run(target: &str) {
        let wrapper = wrapper(target, CannedRunner::new(0, HOPS, ""));
        let err = wrapper.traceroute().await.unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(ref t) if t == target));
        assert_eq!(0, wrapper.inner.runner.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_traceroute_spawn_failed() {
        let runner = CannedRunner::failing(Error::SpawnFailed, io::ErrorKind::NotFound);
        let err = wrapper("192.0.2.1", runner).traceroute().await.unwrap_err();
        assert!(matches!(err, Error::SpawnFailed(ref e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_traceroute_capture_failed() {
        let runner = CannedRunner::failing(Error::CaptureFailed, io::ErrorKind::BrokenPipe);
        let err = wrapper("192.0.2.1", runner).traceroute().await.unwrap_err();
        let Error::CaptureFailed(source) = &err else {
            panic!("expected CaptureFailed");
        };
        assert_eq!(io::ErrorKind::BrokenPipe, source.kind());
        assert!(err.trace_result().is_none());
    }

    #[tokio::test]
    async fn test_traceroute_with_success_matches_return() -> anyhow::Result<()> {
        let wrapper = wrapper("2001:db8::1", CannedRunner::new(0, HOPS, ""));
        let seen = Mutex::new(None);
        let result = wrapper
            .traceroute_with(|outcome| {
                *seen.lock().unwrap() = outcome.as_ref().ok().cloned();
            })
            .await?;
        assert_eq!(Some(result), seen.into_inner().unwrap());
        Ok(())
    }

    #[tokio::test]
    async fn test_traceroute_with_failure_matches_return() {
        let wrapper = wrapper(
            "192.0.2.1",
            CannedRunner::new(1, "", "mtr: permission denied"),
        );
        let seen = Mutex::new(None);
        let err = wrapper
            .traceroute_with(|outcome| {
                *seen.lock().unwrap() = outcome
                    .as_ref()
                    .err()
                    .and_then(Error::trace_result)
                    .cloned();
            })
            .await
            .unwrap_err();
        let seen = seen.into_inner().unwrap().unwrap();
        assert_eq!(err.trace_result(), Some(&seen));
        assert_eq!("mtr: permission denied", seen.results.raw());
    }

    #[tokio::test]
    async fn test_traceroute_with_invalid_target_calls_back() {
        let wrapper = wrapper("example.com", CannedRunner::new(0, HOPS, ""));
        let called = AtomicUsize::new(0);
        let outcome = wrapper
            .traceroute_with(|outcome| {
                assert!(matches!(outcome, Err(Error::InvalidTarget(_))));
                called.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        assert!(outcome.is_err());
        assert_eq!(1, called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_spawn_with() -> anyhow::Result<()> {
        let (wrapper, handle) = wrapper("192.0.2.1", CannedRunner::new(0, HOPS, ""))
            .spawn_with(|outcome| assert!(outcome.is_ok()));
        let result = handle.await??;
        assert_eq!(3, result.as_report().unwrap().hops.len());
        assert_eq!(1, wrapper.inner.runner.calls.load(Ordering::SeqCst));
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_traceroutes_share_wrapper() -> anyhow::Result<()> {
        let wrapper = wrapper("192.0.2.1", CannedRunner::new(0, HOPS, ""));
        let other = wrapper.clone();
        let (first, second) = tokio::join!(wrapper.traceroute(), other.traceroute());
        assert_eq!(first?, second?);
        assert_eq!(2, wrapper.inner.runner.calls.load(Ordering::SeqCst));
        Ok(())
    }

    #[test]
    fn test_accessors() {
        let config = Config::new(PacketSize(100), true, "/opt/mtr");
        let wrapper = MtrWrapper::new("192.0.2.1", config);
        assert_eq!("192.0.2.1", wrapper.target());
        assert_eq!(PacketSize(100), wrapper.packet_len());
        assert!(wrapper.resolve_dns());
        assert_eq!("/opt/mtr", wrapper.program());
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use crate::runner::capture;
        use tokio::process::Command;

        fn sh(script: &str, args: &[String]) -> Command {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(script).arg("sh").args(args);
            cmd
        }

        /// Runs a shell script in place of the probing utility, with the
        /// arguments available as `$@`.
        struct ScriptRunner(&'static str);

        impl Runner for ScriptRunner {
            async fn run(&self, _program: &str, args: &[String]) -> Result<Completion> {
                capture(sh(self.0, args)).await
            }
        }

        /// Runs the next of a fixed sequence of scripts on each call.
        struct SequenceRunner {
            scripts: [&'static str; 2],
            calls: AtomicUsize,
        }

        impl Runner for SequenceRunner {
            async fn run(&self, _program: &str, args: &[String]) -> Result<Completion> {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                let script = self.scripts[call % self.scripts.len()];
                capture(sh(script, args)).await
            }
        }

        fn script_wrapper(target: &str, script: &'static str) -> MtrWrapper<ScriptRunner> {
            MtrWrapper::with_runner(target, Config::default(), ScriptRunner(script))
        }

        #[tokio::test]
        async fn test_traceroute_child_receives_args() -> anyhow::Result<()> {
            let wrapper = script_wrapper("192.0.2.1", r#"printf '%s\n' "$@""#);
            let result = wrapper.traceroute().await?;
            let expected = result.args.join("\n") + "\n";
            assert_eq!(expected, result.results.raw());
            assert!(result.as_report().unwrap().hops.is_empty());
            Ok(())
        }

        #[tokio::test]
        async fn test_traceroute_child_failure() {
            let wrapper = script_wrapper(
                "192.0.2.1",
                "echo partial; echo 'mtr: permission denied' >&2; exit 1",
            );
            let err = wrapper.traceroute().await.unwrap_err();
            let result = err.trace_result().unwrap();
            assert_eq!(ExitCode(1), result.code);
            assert_eq!("mtr: permission denied\n", result.results.raw());
        }

        #[tokio::test]
        async fn test_concurrent_traceroutes_timed_independently() -> anyhow::Result<()> {
            let runner = SequenceRunner {
                scripts: ["sleep 0.3", "true"],
                calls: AtomicUsize::new(0),
            };
            let wrapper = MtrWrapper::with_runner("192.0.2.1", Config::default(), runner);
            let (slow, fast) = tokio::join!(wrapper.traceroute(), wrapper.traceroute());
            let (slow, fast) = (slow?, fast?);
            assert_eq!(2, wrapper.inner.runner.calls.load(Ordering::SeqCst));
            assert!(slow.elapsed >= Duration::from_millis(300));
            assert!(fast.elapsed < Duration::from_millis(300));
            Ok(())
        }

        #[tokio::test]
        async fn test_traceroute_missing_program() {
            let config = Config::new(PacketSize(60), false, "/nonexistent/mtrwrap-missing-mtr");
            let wrapper = MtrWrapper::new("192.0.2.1", config);
            let err = wrapper.traceroute().await.unwrap_err();
            assert!(matches!(err, Error::SpawnFailed(_)));
        }
    }
}
