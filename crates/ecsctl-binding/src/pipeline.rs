//! The invocation pipeline: Bind → Confirm → Assemble → Invoke → Project.

use crate::cancel::StopSignal;
use crate::confirm::{self, Confirmer};
use crate::context::{Context, ContextBuilder};
use crate::descriptor::CommandDescriptor;
use crate::error::{BindError, CommandError, InvokeError};
use crate::invoke::{invoke, Transport};
use crate::select::{Projection, Selector};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::marker::PhantomData;

/// Parameter that, when bound by the caller, turns auto-iteration off.
const NEXT_TOKEN: &str = "NextToken";

/// One remote operation with its parameter surface, request assembly and
/// response projection.
pub trait Operation: Send + Sync + 'static {
    type Request: Serialize + Send + Sync;
    type Response: Serialize + DeserializeOwned + Send + Sync;
    type Field: Projection<Response = Self::Response>;

    fn descriptor() -> &'static CommandDescriptor;

    /// Build the nested request from the flat context.
    fn assemble(context: &Context) -> Result<Self::Request, BindError>;

    /// Continuation token of a paged response. Non-paged operations keep the
    /// default.
    fn next_token(_response: &Self::Response) -> Option<&str> {
        None
    }

    fn set_next_token(_request: &mut Self::Request, _token: String) {}

    /// Fold `page` into `into`, taking over the page's continuation token.
    fn append_page(_into: &mut Self::Response, _page: Self::Response) {}
}

/// Per-invocation switches that are not request parameters.
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    pub select: Option<String>,
    /// Legacy shorthand for `--select ^<pipeline parameter>`.
    pub pass_thru: bool,
    /// Skip the confirmation gate.
    pub force: bool,
    pub no_auto_iteration: bool,
}

/// Services an invocation runs against.
#[derive(Clone, Copy)]
pub struct Session<'a> {
    pub transport: &'a dyn Transport,
    pub confirmer: &'a dyn Confirmer,
    pub stop: &'a StopSignal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The projected output.
    Output(Value),
    /// The confirmation gate said no; nothing was sent.
    Declined,
}

/// Object-safe handle on an [`Operation`], so commands can live in one table.
#[async_trait]
pub trait Cmdlet: Send + Sync {
    fn descriptor(&self) -> &'static CommandDescriptor;

    async fn run(
        &self,
        bindings: ContextBuilder,
        options: &InvokeOptions,
        session: Session<'_>,
    ) -> Result<Outcome, CommandError>;
}

pub struct Binding<O>(PhantomData<fn() -> O>);

impl<O> Binding<O> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<O> Default for Binding<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<O: Operation> Cmdlet for Binding<O> {
    fn descriptor(&self) -> &'static CommandDescriptor {
        O::descriptor()
    }

    async fn run(
        &self,
        bindings: ContextBuilder,
        options: &InvokeOptions,
        session: Session<'_>,
    ) -> Result<Outcome, CommandError> {
        execute::<O>(bindings, options, session).await
    }
}

/// Run one invocation of `O` end to end.
pub async fn execute<O: Operation>(
    bindings: ContextBuilder,
    options: &InvokeOptions,
    session: Session<'_>,
) -> Result<Outcome, CommandError> {
    let descriptor = O::descriptor();
    let context = bindings.finish();
    let selector = resolve_selector::<O::Field>(options, descriptor)?;

    if !options.force {
        if let Some(prompt) = confirm::prompt_for(&context) {
            if !session.confirmer.confirm(&prompt) {
                if session.stop.is_stopped() {
                    return Err(InvokeError::Cancelled {
                        operation: descriptor.operation.to_string(),
                    }
                    .into());
                }
                tracing::info!(command = descriptor.name, "declined at confirmation");
                return Ok(Outcome::Declined);
            }
        }
    }

    let mut request = O::assemble(&context)?;
    let mut response = call::<O>(&request, session).await?;

    let auto_iterate = !options.no_auto_iteration && !context.is_bound(NEXT_TOKEN);
    if auto_iterate {
        let mut sent_tokens = HashSet::new();
        while let Some(token) = O::next_token(&response)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
        {
            if !sent_tokens.insert(token.clone()) {
                tracing::warn!(
                    command = descriptor.name,
                    token = %token,
                    "service returned a page token already followed; stopping"
                );
                break;
            }
            tracing::debug!(command = descriptor.name, page = sent_tokens.len() + 1, "fetching next page");
            O::set_next_token(&mut request, token);
            let page = call::<O>(&request, session).await?;
            O::append_page(&mut response, page);
        }
    }

    Ok(Outcome::Output(selector.apply(&response, &context)))
}

fn resolve_selector<F: Projection>(
    options: &InvokeOptions,
    descriptor: &'static CommandDescriptor,
) -> Result<Selector<F>, BindError> {
    match (options.pass_thru, options.select.as_deref()) {
        (true, Some(_)) => Err(BindError::ConflictingSelectors),
        (true, None) => {
            let param = descriptor
                .pipeline_param()
                .ok_or_else(|| BindError::InvalidSelector {
                    selector: "--pass-thru".to_string(),
                    reason: format!("{} has no pipeline parameter to echo", descriptor.name),
                })?;
            Ok(Selector::Echo(param.name))
        }
        (false, text) => Selector::resolve(text.unwrap_or(descriptor.default_select), descriptor),
    }
}

async fn call<O: Operation>(
    request: &O::Request,
    session: Session<'_>,
) -> Result<O::Response, InvokeError> {
    let operation = O::descriptor().operation;
    let body = serde_json::to_string(request).map_err(|source| InvokeError::Encode {
        operation: operation.to_string(),
        source,
    })?;
    let raw = invoke(session.transport, operation, body, session.stop).await?;
    let raw = if raw.trim().is_empty() { "{}" } else { raw.as_str() };
    serde_json::from_str(raw).map_err(|source| InvokeError::Decode {
        operation: operation.to_string(),
        source,
    })
}
