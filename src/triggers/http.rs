use super::{Trigger, TriggerError};
use crate::context::Context;
use log::{debug, info, warn};
use std::{collections::HashMap, io::Read, sync::mpsc::Sender};
use tiny_http::{Request, Response, Server, StatusCode};
use url::form_urlencoded;

const TRIGGER_NAME: &str = "HTTP";

/// A trigger that runs on an HTTP request carrying the secret key.
///
/// This could be used to deploy from git remotes (e.g. GitHub, GitLab, Bitbucket) with webhooks,
/// calling `https://example.com/?key=<secret>`. Requests without the right key are ignored.
pub struct HttpTrigger {
    http: String,
    secret: String,
}

/// Compare the strings without stopping at the first difference.
fn secrets_match(expected: &str, actual: &str) -> bool {
    expected.len() == actual.len()
        && expected
            .bytes()
            .zip(actual.bytes())
            .fold(0, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Find the decoded value of a query parameter in the request URL.
fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split_once('#').map_or(query, |(query, _)| query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Answer the request. The client hanging up is not a reason to stop the server.
fn respond<R: Read>(request: Request, response: Response<R>) {
    if let Err(err) = request.respond(response) {
        warn!("Failed responding to the request: {err}.");
    }
}

impl HttpTrigger {
    /// Create an new HTTP trigger with an address and the secret key. It accepts an address
    /// as a string, for example "1234" or "0.0.0.0:1234".
    pub fn new(http: String, secret: String) -> Self {
        Self { http, secret }
    }

    fn is_authorized(&self, url: &str) -> bool {
        query_param(url, "key").is_some_and(|key| secrets_match(&self.secret, &key))
    }

    fn handle(&self, request: Request, tx: &Sender<Option<Context>>) -> Result<(), TriggerError> {
        let method = request.method().to_string();
        let path = request
            .url()
            .split_once('?')
            .map_or(request.url(), |(path, _)| path)
            .to_string();

        if !self.is_authorized(request.url()) {
            debug!("Rejected request on {method} {path}.");
            respond(request, Response::empty(StatusCode(403)));
            return Ok(());
        }

        info!("Received request on {method} {path}.");
        let context: Context = HashMap::from([
            ("TRIGGER_NAME".to_string(), TRIGGER_NAME.to_string()),
            ("HTTP_METHOD".to_string(), method),
            ("HTTP_URL".to_string(), path),
        ]);
        tx.send(Some(context))?;

        respond(request, Response::from_string("OK"));
        Ok(())
    }
}

impl Trigger for HttpTrigger {
    /// Starts a minimal HTTP 1.1 server, that triggers on every authorized request.
    ///
    /// Every method and every URL is accepted if the `key` query parameter is the secret:
    /// these return 200 status code with plaintext "OK". Every other request returns
    /// 403 status code with an empty body.
    fn listen(&self, tx: Sender<Option<Context>>) -> Result<(), TriggerError> {
        if self.secret.is_empty() {
            return Err(TriggerError::Misconfigured(String::from(
                "the secret key cannot be empty",
            )));
        }

        let listener = Server::http(&self.http).map_err(|_| {
            TriggerError::Misconfigured(format!("cannot start server on {}", self.http))
        })?;
        info!("Listening on {}...", self.http);
        for request in listener.incoming_requests() {
            self.handle(request, &tx)?;
        }
        Ok(())
    }
}
