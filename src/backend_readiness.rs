//! Readiness wait for the backend address.
//!
//! A probe is one HTTP GET against the backend URL. Any response, whatever its
//! status code, means the server is up; any network-level error (refused,
//! timeout, DNS) means "not yet". Attempts are spaced by capped exponential
//! backoff and bounded by an overall deadline, and a child that dies while we
//! wait aborts the loop instead of burning the rest of the deadline.

use std::{
    thread,
    time::{Duration, Instant},
};

use crate::{append_startup_log, BackendError, BackendState, LaunchPlan, PROBE_ATTEMPT_TIMEOUT_MS};

#[derive(Debug, Clone)]
pub(crate) struct RetryPolicy {
    pub(crate) initial_delay: Duration,
    pub(crate) max_delay: Duration,
    pub(crate) deadline: Duration,
}

#[derive(Debug)]
pub(crate) struct ReadyStats {
    pub(crate) attempts: u32,
    pub(crate) elapsed: Duration,
}

pub(crate) fn next_backoff(current: Duration, max_delay: Duration) -> Duration {
    (current * 2).min(max_delay)
}

/// Single readiness probe with its own timeout. Status codes are deliberately
/// not inspected: a 500 from the backend still proves the server is bound.
pub(crate) fn probe_backend(client: &reqwest::blocking::Client, url: &str) -> bool {
    client.get(url).send().is_ok()
}

/// One-shot probe for the pre-spawn check; a client that cannot even be
/// constructed counts as unreachable.
pub(crate) fn probe_once(url: &str, timeout: Duration) -> bool {
    match reqwest::blocking::Client::builder().timeout(timeout).build() {
        Ok(client) => probe_backend(&client, url),
        Err(_) => false,
    }
}

/// Core retry loop, decoupled from the HTTP client and the process table so
/// the schedule and abort conditions are testable: `probe` reports whether the
/// backend answered, `child_check` returns an error when the child is gone.
pub(crate) fn wait_until_ready<P, W>(
    policy: &RetryPolicy,
    mut probe: P,
    mut child_check: W,
) -> Result<ReadyStats, BackendError>
where
    P: FnMut() -> bool,
    W: FnMut() -> Result<(), BackendError>,
{
    let start_time = Instant::now();
    let mut attempts = 0u32;
    let mut delay = policy.initial_delay;

    loop {
        attempts += 1;
        if probe() {
            return Ok(ReadyStats {
                attempts,
                elapsed: start_time.elapsed(),
            });
        }

        child_check()?;

        if start_time.elapsed() >= policy.deadline {
            return Err(BackendError::StartupTimeout {
                elapsed_ms: start_time.elapsed().as_millis(),
                attempts,
            });
        }

        thread::sleep(delay);
        delay = next_backoff(delay, policy.max_delay);
    }
}

impl BackendState {
    pub(crate) fn wait_for_backend(&self, plan: &LaunchPlan) -> Result<(), BackendError> {
        let policy = crate::backend_config::retry_policy(plan.packaged_mode);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(PROBE_ATTEMPT_TIMEOUT_MS))
            .build()
            .map_err(BackendError::ProbeClient)?;

        let stats = wait_until_ready(
            &policy,
            || probe_backend(&client, &self.backend_url),
            || self.check_child_running(),
        )?;
        append_startup_log(&format!(
            "backend ready after {} attempt(s) in {}ms",
            stats.attempts,
            stats.elapsed.as_millis()
        ));
        Ok(())
    }

    fn check_child_running(&self) -> Result<(), BackendError> {
        let mut guard = self.child.lock().map_err(|_| BackendError::LockPoisoned)?;
        match guard.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(status)) => {
                    *guard = None;
                    Err(BackendError::ExitedEarly { status })
                }
                Ok(None) => Ok(()),
                Err(error) => Err(BackendError::ChildStatus(error)),
            },
            None => Err(BackendError::NotRunning),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        sync::atomic::{AtomicU32, Ordering},
    };

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            deadline: Duration::from_millis(200),
        }
    }

    #[test]
    fn next_backoff_doubles_until_capped() {
        let max = Duration::from_millis(2_000);
        let mut delay = Duration::from_millis(200);
        let mut schedule = Vec::new();
        for _ in 0..6 {
            delay = next_backoff(delay, max);
            schedule.push(delay.as_millis());
        }
        assert_eq!(schedule, vec![400, 800, 1600, 2000, 2000, 2000]);
    }

    #[test]
    fn wait_succeeds_on_first_probe_without_sleeping() {
        let started = Instant::now();
        let stats = wait_until_ready(&fast_policy(), || true, || Ok(()))
            .expect("ready backend should succeed");
        assert_eq!(stats.attempts, 1);
        // No backoff sleep may happen before the first success.
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn wait_succeeds_on_attempt_after_n_failures() {
        let calls = AtomicU32::new(0);
        let stats = wait_until_ready(
            &fast_policy(),
            || calls.fetch_add(1, Ordering::SeqCst) >= 3,
            || Ok(()),
        )
        .expect("backend becoming ready should succeed");
        assert_eq!(stats.attempts, 4);
    }

    #[test]
    fn wait_times_out_in_bounded_time_when_backend_never_answers() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            deadline: Duration::from_millis(30),
        };
        let started = Instant::now();
        let error = wait_until_ready(&policy, || false, || Ok(()))
            .expect_err("unreachable backend must time out");
        assert!(started.elapsed() < Duration::from_secs(5));
        match error {
            BackendError::StartupTimeout { attempts, .. } => assert!(attempts >= 2),
            other => panic!("expected StartupTimeout, got {other:?}"),
        }
    }

    #[test]
    fn wait_aborts_when_child_check_reports_exit() {
        let error = wait_until_ready(&fast_policy(), || false, || Err(BackendError::NotRunning))
            .expect_err("dead child must abort the wait");
        assert!(matches!(error, BackendError::NotRunning));
    }

    /// Minimal HTTP responder: reads the request head, answers with the given
    /// status line, closes the connection.
    fn serve_one(listener: TcpListener, status_line: &'static str) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buffer = [0u8; 1024];
                let _ = stream.read(&mut buffer);
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                );
                let _ = stream.write_all(response.as_bytes());
            }
        })
    }

    #[test]
    fn probe_treats_any_http_response_as_ready() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let address = listener.local_addr().expect("local addr");
        let handle = serve_one(listener, "503 Service Unavailable");

        let url = format!("http://{address}/");
        assert!(probe_once(&url, Duration::from_secs(2)));
        handle.join().expect("responder thread");
    }

    #[test]
    fn probe_reports_unreachable_on_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let address = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
            listener.local_addr().expect("local addr")
        };
        let url = format!("http://{address}/");
        assert!(!probe_once(&url, Duration::from_millis(500)));
    }
}
