//! Test-facing DSL for mockmvc.
//!
//! ```ignore
//! use mockmvc_test::prelude::*;
//!
//! let tester = StandaloneSetup::new()
//!     .get("/hotels", FnController::shared("listHotels", |_, _| {
//!         Ok(Some(ModelAndView::empty().attribute("count", 2)))
//!     }))
//!     .build();
//!
//! tester
//!     .perform(get("/hotels"))?
//!     .and_expect(status::is_ok())
//!     .and_expect(view::name("hotels"))
//!     .and_expect(model::attribute("count", 2))
//!     .and_do(print())?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod matchers;
pub mod print;
pub mod requests;
pub mod result_actions;
pub mod setup;

pub use config::MockMvcConfig;
pub use error::{AssertionError, TestError, TestResult};
pub use result_actions::{ResultActions, ResultHandler};
pub use setup::{MockMvcTester, StandaloneSetup};

/// Everything a typical test needs in one import.
pub mod prelude {
    pub use crate::config::MockMvcConfig;
    pub use crate::error::{AssertionError, TestError, TestResult};
    pub use crate::logging::init_test_logging;
    pub use crate::matchers::{
        ResultMatcher, content, cookie, flash, forwarded_url, handler, header, model,
        redirected_url, request, status, view,
    };
    pub use crate::print::{log, print, print_to};
    pub use crate::requests::{delete, get, head, multipart, options, patch, post, put};
    pub use crate::result_actions::{ResultActions, ResultHandler};
    pub use crate::setup::{MockMvcTester, StandaloneSetup};

    pub use mockmvc_adapters::{FnController, FnRequestHandler};
    pub use mockmvc_core::prelude::*;
}
