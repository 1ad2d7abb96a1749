//! Vote submission - the client half of the /vote contract

use crate::constants::{NAME_REQUIRED_MSG, SUBMIT_FAILED_MSG};
use crate::types::{Choice, VotePayload, VoteState};
use eframe::egui;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// Sends vote POSTs and applies their outcomes to the shared vote state.
///
/// Each `submit` call is independent: no queueing, no retry, no cancellation,
/// no client-side timeout. When several calls are in flight, whichever
/// response arrives last determines the error line.
pub struct VoteSubmitter {
    client: reqwest::Client,
    endpoint: String,
    state: Arc<Mutex<VoteState>>,
}

impl VoteSubmitter {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            state: Arc::new(Mutex::new(VoteState::default())),
        }
    }

    /// Shared handle to the vote state for the UI to read
    pub fn state(&self) -> Arc<Mutex<VoteState>> {
        self.state.clone()
    }

    /// Validate the name, record the choice, and fire the vote POST.
    ///
    /// An empty name (after trimming) sets the validation message and makes
    /// no network call. Otherwise the choice is recorded before the backend
    /// answers; a later failure only sets the error line and does not take
    /// the recorded choice back down.
    pub fn submit(
        &self,
        choice: Choice,
        name: &str,
        runtime: &tokio::runtime::Runtime,
        ctx: &egui::Context,
    ) {
        let name = name.trim();
        if name.is_empty() {
            debug!("Vote rejected locally: empty name");
            self.state.lock().unwrap().last_error = Some(NAME_REQUIRED_MSG.to_string());
            ctx.request_repaint();
            return;
        }

        {
            let mut s = self.state.lock().unwrap();
            s.last_choice = Some(choice);
            s.last_error = None;
            s.in_flight += 1;
            s.requests_sent += 1;
        }
        ctx.request_repaint();

        let payload = VotePayload {
            choice: choice.label().to_string(),
            name: name.to_string(),
        };

        info!(choice = choice.label(), name = %payload.name, "Submitting vote");

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let state = self.state.clone();
        let ctx = ctx.clone();

        runtime.spawn(async move {
            let result = client.post(&endpoint).json(&payload).send().await;

            let accepted = match result {
                Ok(response) if response.status().is_success() => {
                    debug!(status = %response.status(), "Vote acknowledged");
                    // Body is informational only; log it when readable
                    if let Ok(body) = response.text().await {
                        debug!(%body, "Backend response");
                    }
                    true
                }
                Ok(response) => {
                    error!(status = %response.status(), "Backend rejected vote");
                    false
                }
                Err(e) => {
                    error!(error = %e, "Vote request failed");
                    false
                }
            };

            let mut s = state.lock().unwrap();
            s.in_flight -= 1;
            s.last_error = if accepted {
                None
            } else {
                Some(SUBMIT_FAILED_MSG.to_string())
            };
            drop(s);
            ctx.request_repaint();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::vote_url;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    /// Minimal loopback HTTP server that records raw requests and answers
    /// every one of them with the given status line.
    fn spawn_backend(
        runtime: &tokio::runtime::Runtime,
        status_line: &'static str,
    ) -> (String, Arc<Mutex<Vec<String>>>) {
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = requests.clone();

        runtime.spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut raw = Vec::new();
                    let mut buf = [0u8; 1024];
                    loop {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => raw.extend_from_slice(&buf[..n]),
                        }
                        if request_complete(&raw) {
                            break;
                        }
                    }
                    seen.lock()
                        .unwrap()
                        .push(String::from_utf8_lossy(&raw).into_owned());
                    let reply = format!(
                        "{status_line}\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{{}}"
                    );
                    let _ = socket.write_all(reply.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (format!("http://{addr}/vote"), requests)
    }

    /// Headers plus a content-length'd body have fully arrived
    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let expected = text[..split]
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                if key.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        text.len() - (split + 4) >= expected
    }

    /// Endpoint on a port nothing is listening on
    fn refused_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/vote")
    }

    fn wait_until_idle(state: &Arc<Mutex<VoteState>>) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.lock().unwrap().in_flight > 0 {
            assert!(Instant::now() < deadline, "submission never resolved");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn empty_name_is_rejected_without_a_request() {
        let runtime = test_runtime();
        let (endpoint, requests) = spawn_backend(&runtime, "HTTP/1.1 200 OK");
        let submitter = VoteSubmitter::new(endpoint);
        let ctx = egui::Context::default();

        submitter.submit(Choice::Second, "", &runtime, &ctx);
        submitter.submit(Choice::Second, "   ", &runtime, &ctx);

        let state = submitter.state();
        let s = state.lock().unwrap();
        assert_eq!(s.last_error.as_deref(), Some(NAME_REQUIRED_MSG));
        assert_eq!(s.last_choice, None);
        assert_eq!(s.requests_sent, 0);
        assert_eq!(s.in_flight, 0);
        assert!(requests.lock().unwrap().is_empty());
    }

    #[test]
    fn accepted_vote_records_choice_and_posts_the_payload() {
        let runtime = test_runtime();
        let (endpoint, requests) = spawn_backend(&runtime, "HTTP/1.1 200 OK");
        let submitter = VoteSubmitter::new(endpoint);
        let state = submitter.state();
        let ctx = egui::Context::default();

        submitter.submit(Choice::First, "Alice", &runtime, &ctx);
        wait_until_idle(&state);

        let s = state.lock().unwrap();
        assert_eq!(s.last_choice, Some(Choice::First));
        assert_eq!(s.last_error, None);
        assert_eq!(s.requests_sent, 1);
        drop(s);

        let seen = requests.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("POST /vote "));
        assert!(seen[0].contains(r#""choice":"Choice 1""#));
        assert!(seen[0].contains(r#""name":"Alice""#));
    }

    #[test]
    fn name_is_trimmed_before_sending() {
        let runtime = test_runtime();
        let (endpoint, requests) = spawn_backend(&runtime, "HTTP/1.1 200 OK");
        let submitter = VoteSubmitter::new(endpoint);
        let state = submitter.state();
        let ctx = egui::Context::default();

        submitter.submit(Choice::First, "  Alice  ", &runtime, &ctx);
        wait_until_idle(&state);

        let seen = requests.lock().unwrap();
        assert!(seen[0].contains(r#""name":"Alice""#));
    }

    #[test]
    fn backend_error_sets_message_but_keeps_choice() {
        let runtime = test_runtime();
        let (endpoint, _requests) = spawn_backend(&runtime, "HTTP/1.1 500 Internal Server Error");
        let submitter = VoteSubmitter::new(endpoint);
        let state = submitter.state();
        let ctx = egui::Context::default();

        submitter.submit(Choice::Second, "Bob", &runtime, &ctx);
        wait_until_idle(&state);

        let s = state.lock().unwrap();
        assert_eq!(s.last_choice, Some(Choice::Second));
        assert_eq!(s.last_error.as_deref(), Some(SUBMIT_FAILED_MSG));
    }

    #[test]
    fn unreachable_backend_sets_message_but_keeps_choice() {
        let runtime = test_runtime();
        let submitter = VoteSubmitter::new(refused_endpoint());
        let state = submitter.state();
        let ctx = egui::Context::default();

        submitter.submit(Choice::Second, "Bob", &runtime, &ctx);
        wait_until_idle(&state);

        let s = state.lock().unwrap();
        assert_eq!(s.last_choice, Some(Choice::Second));
        assert_eq!(s.last_error.as_deref(), Some(SUBMIT_FAILED_MSG));
        assert_eq!(s.requests_sent, 1);
    }

    #[test]
    fn success_clears_the_previous_error() {
        let runtime = test_runtime();
        let (good_endpoint, _requests) = spawn_backend(&runtime, "HTTP/1.1 200 OK");

        let failing = VoteSubmitter::new(refused_endpoint());
        let state = failing.state();
        let ctx = egui::Context::default();

        failing.submit(Choice::First, "Carol", &runtime, &ctx);
        wait_until_idle(&state);
        assert!(state.lock().unwrap().last_error.is_some());

        // Same session state, now against a reachable backend
        let working = VoteSubmitter {
            client: reqwest::Client::new(),
            endpoint: good_endpoint,
            state: state.clone(),
        };
        working.submit(Choice::First, "Carol", &runtime, &ctx);
        wait_until_idle(&state);

        let s = state.lock().unwrap();
        assert_eq!(s.last_choice, Some(Choice::First));
        assert_eq!(s.last_error, None);
    }

    #[test]
    fn repeat_submission_only_adds_a_second_request() {
        let runtime = test_runtime();
        let (endpoint, requests) = spawn_backend(&runtime, "HTTP/1.1 200 OK");
        let submitter = VoteSubmitter::new(endpoint);
        let state = submitter.state();
        let ctx = egui::Context::default();

        submitter.submit(Choice::First, "Alice", &runtime, &ctx);
        wait_until_idle(&state);
        submitter.submit(Choice::First, "Alice", &runtime, &ctx);
        wait_until_idle(&state);

        let s = state.lock().unwrap();
        assert_eq!(s.last_choice, Some(Choice::First));
        assert_eq!(s.last_error, None);
        assert_eq!(s.requests_sent, 2);
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[test]
    fn vote_url_is_fixed_to_the_backend_port() {
        assert_eq!(vote_url("localhost"), "http://localhost:30002/vote");
        assert_eq!(vote_url("10.0.0.7"), "http://10.0.0.7:30002/vote");
    }
}
