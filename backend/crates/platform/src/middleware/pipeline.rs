//! Request Policy Pipeline
//!
//! An explicit, ordered list of [`Policy`] stages run in front of the
//! business handlers. Each stage either lets the request through or answers
//! it itself; later stages and the handler never see a rejected request.
//!
//! On the way out, `on_response` runs in reverse order for every stage that
//! let the request through, whether the response came from the handler or
//! from a later stage's rejection.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Method, Request, header};
use axum::middleware::Next;
use axum::response::Response;

/// Per-request facts captured before the first stage runs
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub origin: Option<HeaderValue>,
    pub started_at: Instant,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            origin: req.headers().get(header::ORIGIN).cloned(),
            started_at: Instant::now(),
        }
    }
}

/// One intercept-or-forward stage
pub trait Policy: Send + Sync + 'static {
    /// Stage name for logs
    fn name(&self) -> &'static str;

    /// Inspect (and possibly annotate) the request
    ///
    /// `Err(response)` short-circuits the pipeline with that response.
    fn on_request(&self, ctx: &RequestContext, req: &mut Request<Body>) -> Result<(), Response>;

    /// Decorate the outgoing response
    fn on_response(&self, _ctx: &RequestContext, _res: &mut Response) {}
}

/// Ordered policy chain
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Policy>>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run the chain in front of `next`
    pub async fn run(&self, req: Request<Body>, next: Next) -> Response {
        self.run_with(req, move |req| next.run(req)).await
    }

    /// Run the chain in front of an arbitrary handler
    pub async fn run_with<F, Fut>(&self, mut req: Request<Body>, handler: F) -> Response
    where
        F: FnOnce(Request<Body>) -> Fut,
        Fut: Future<Output = Response>,
    {
        let ctx = RequestContext::from_request(&req);

        let mut passed = 0;
        let mut rejection = None;
        for stage in &self.stages {
            match stage.on_request(&ctx, &mut req) {
                Ok(()) => passed += 1,
                Err(response) => {
                    tracing::debug!(
                        stage = stage.name(),
                        method = %ctx.method,
                        path = %ctx.path,
                        status = response.status().as_u16(),
                        "Request short-circuited"
                    );
                    rejection = Some(response);
                    break;
                }
            }
        }

        let mut response = match rejection {
            Some(response) => response,
            None => handler(req).await,
        };

        for stage in self.stages[..passed].iter().rev() {
            stage.on_response(&ctx, &mut response);
        }

        response
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for [`Pipeline`]; stages run in the order they are added
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Policy>>,
}

impl PipelineBuilder {
    pub fn stage<P: Policy>(mut self, policy: P) -> Self {
        self.stages.push(Arc::new(policy));
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

/// axum adapter: `middleware::from_fn_with_state(Arc::new(pipeline), apply_pipeline)`
pub async fn apply_pipeline(
    State(pipeline): State<Arc<Pipeline>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    pipeline.run(req, next).await
}
