//! Ambient "current request" for handler code.
//!
//! The dispatcher installs a [`RequestContext`] for the duration of one
//! dispatch through a [`RequestContextGuard`]. The guard restores whatever
//! was installed before it when dropped, including on early return or
//! panic, so nothing leaks into the next dispatch or across threads.

use std::cell::RefCell;

use http::Method;
use uuid::Uuid;

use super::entities::request::MockRequest;

thread_local! {
    static CURRENT: RefCell<Option<RequestContext>> = const { RefCell::new(None) };
}

/// Snapshot of the in-flight request's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    dispatch_id: Uuid,
    method: Method,
    request_uri: String,
    query_string: Option<String>,
}

impl RequestContext {
    pub fn for_request(request: &MockRequest) -> Self {
        Self {
            dispatch_id: Uuid::new_v4(),
            method: request.method().clone(),
            request_uri: request.request_uri().to_string(),
            query_string: request.query_string().map(str::to_string),
        }
    }

    /// Unique id of the dispatch this context belongs to.
    pub fn dispatch_id(&self) -> Uuid {
        self.dispatch_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }
}

/// The context of the dispatch running on this thread, if any.
pub fn current() -> Option<RequestContext> {
    CURRENT.with(|c| c.borrow().clone())
}

/// Scope guard that installs a context and restores the previous one on drop.
#[must_use = "the request context is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RequestContextGuard {
    previous: Option<RequestContext>,
}

impl RequestContextGuard {
    pub fn install(context: RequestContext) -> Self {
        let previous = CURRENT.with(|c| c.borrow_mut().replace(context));
        Self { previous }
    }
}

impl Drop for RequestContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|c| *c.borrow_mut() = previous);
    }
}
