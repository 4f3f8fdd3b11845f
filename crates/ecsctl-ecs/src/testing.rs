//! Test fixtures: bind text pairs, assemble requests, and run commands
//! against a recording transport.

use async_trait::async_trait;
use ecsctl_binding::{
    execute, AssumeYes, CommandError, Context, ContextBuilder, InvokeOptions, Operation, Outcome,
    Session, StopSignal, Transport, TransportError,
};
use serde_json::Value;
use std::sync::Mutex;

pub(crate) fn bindings<O: Operation>(pairs: &[(&str, &str)]) -> ContextBuilder {
    let mut builder = ContextBuilder::new(O::descriptor());
    for (name, raw) in pairs {
        builder.bind_text(name, raw).unwrap();
    }
    builder
}

pub(crate) fn context<O: Operation>(pairs: &[(&str, &str)]) -> Context {
    bindings::<O>(pairs).finish()
}

/// The request body `O` would send for `pairs`.
pub(crate) fn assembled<O: Operation>(pairs: &[(&str, &str)]) -> Value {
    serde_json::to_value(O::assemble(&context::<O>(pairs)).unwrap()).unwrap()
}

/// Replays canned replies in order and records every call.
#[derive(Default)]
pub(crate) struct Recorder {
    replies: Mutex<Vec<String>>,
    sent: Mutex<Vec<(String, Value)>>,
}

impl Recorder {
    pub(crate) fn replying(replies: &[Value]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(Value::to_string).collect()),
            sent: Mutex::default(),
        }
    }

    pub(crate) fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for Recorder {
    fn endpoint(&self) -> String {
        "http://recorder.test".into()
    }

    async fn send(&self, operation: &str, body: String) -> Result<String, TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((operation.to_string(), serde_json::from_str(&body).unwrap()));
        Ok(self.replies.lock().unwrap().pop().unwrap_or_default())
    }
}

/// Run `O` with `--force`, returning the projected output.
pub(crate) async fn run<O: Operation>(
    transport: &Recorder,
    pairs: &[(&str, &str)],
    select: Option<&str>,
) -> Result<Value, CommandError> {
    let stop = StopSignal::new();
    let options = InvokeOptions {
        select: select.map(str::to_string),
        force: true,
        ..Default::default()
    };
    let session = Session {
        transport,
        confirmer: &AssumeYes,
        stop: &stop,
    };
    match execute::<O>(bindings::<O>(pairs), &options, session).await? {
        Outcome::Output(value) => Ok(value),
        Outcome::Declined => panic!("forced runs never decline"),
    }
}
