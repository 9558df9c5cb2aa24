//! End-to-end tests: standalone setup, fluent expectations, printing.

use std::sync::{Arc, Mutex};

use mockall::mock;
use mockmvc_adapters::{JsonView, SimpleMappingExceptionResolver, StaticViewResolver};
use mockmvc_test::prelude::*;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("illegal state: {0}")]
struct IllegalState(&'static str);

mock! {
    pub RouterPort {}
    impl Router for RouterPort {
        fn route(&self, request: &mut MockRequest) -> Option<HandlerExecutionChain>;
    }
}

struct Recording {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Interceptor for Recording {
    fn pre_handle(
        &self,
        _request: &mut MockRequest,
        _response: &mut MockResponse,
        _handler: &dyn Handler,
    ) -> HandlerResult<bool> {
        self.log.lock().unwrap().push(format!("pre:{}", self.name));
        Ok(true)
    }

    fn post_handle(
        &self,
        _request: &mut MockRequest,
        _response: &mut MockResponse,
        _handler: &dyn Handler,
        _model_and_view: Option<&mut ModelAndView>,
    ) -> HandlerResult<()> {
        self.log.lock().unwrap().push(format!("post:{}", self.name));
        Ok(())
    }
}

fn greet() -> HandlerRef {
    FnController::shared("greet", |request, _| {
        let name = request.parameter("name").unwrap_or("nobody").to_string();
        Ok(Some(
            ModelAndView::with_view_name("greeting").attribute("message", format!("Hello, {name}")),
        ))
    })
}

#[test]
fn test_greeting_renders_view_with_model() {
    init_test_logging();
    let tester = StandaloneSetup::new().get("/greet", greet()).build();

    tester
        .perform(get("/greet?name=World"))
        .unwrap()
        .and_expect(status::is_ok())
        .and_expect(view::name("greeting"))
        .and_expect(model::attribute("message", "Hello, World"))
        .and_expect(handler::name("greet"))
        .and_expect(forwarded_url("greeting"));
}

#[test]
fn test_mapped_error_renders_error_view() {
    let tester = StandaloneSetup::new()
        .post(
            "/items",
            FnController::shared("createItem", |_, _| {
                Err(HandlerError::new(IllegalState("inventory closed")))
            }),
        )
        .exception_resolver(Arc::new(
            SimpleMappingExceptionResolver::new()
                .map_type::<IllegalState>("error")
                .exception_attribute(None),
        ))
        .build();

    let result = tester
        .perform(post("/items"))
        .unwrap()
        .and_expect(handler::resolved_error_is::<IllegalState>())
        .and_expect(handler::resolved_error_message("illegal state: inventory closed"))
        .and_expect(view::name("error"))
        .and_expect(model::size(0))
        .and_return();

    assert_eq!(result.response().forwarded_url(), Some("error"));
}

#[test]
fn test_unmatched_request_completes_as_404() {
    let tester = StandaloneSetup::new().get("/greet", greet()).build();

    tester
        .perform(get("/missing"))
        .unwrap()
        .and_expect(status::is_not_found())
        .and_expect(handler::none())
        .and_expect(view::none());
}

#[test]
fn test_root_handler_with_empty_model_and_view_renders() {
    let tester = StandaloneSetup::new()
        .get(
            "/",
            FnController::shared("home", |_, _| Ok(Some(ModelAndView::empty()))),
        )
        .build();

    tester
        .perform(get("/"))
        .unwrap()
        .and_expect(status::is_ok())
        .and_expect(handler::name("home"))
        .and_expect(view::name(""));
}

#[test]
fn test_unmapped_error_fails_perform() {
    let tester = StandaloneSetup::new()
        .get(
            "/boom",
            FnController::shared("boom", |_, _| Err(HandlerError::new(IllegalState("boom")))),
        )
        .build();

    let err = tester.perform(get("/boom")).unwrap_err();
    match err {
        TestError::MockMvc(e) => {
            assert!(e.handler_error().unwrap().is::<IllegalState>());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_interceptors_wrap_handler() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let tester = StandaloneSetup::new()
        .get("/greet", greet())
        .interceptor(Arc::new(Recording {
            name: "a",
            log: Arc::clone(&log),
        }))
        .interceptor(Arc::new(Recording {
            name: "b",
            log: Arc::clone(&log),
        }))
        .build();

    let result = tester.perform(get("/greet")).unwrap().and_return();

    assert_eq!(result.interceptors().len(), 2);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["pre:a", "pre:b", "post:b", "post:a"]
    );
}

#[test]
fn test_extra_router_consulted_after_routes() {
    let mut router = MockRouterPort::new();
    router.expect_route().times(1).returning(|_| {
        Some(HandlerExecutionChain::new(FnController::shared(
            "fallback",
            |_, _| Ok(Some(ModelAndView::with_view_name("fallback"))),
        )))
    });

    let tester = StandaloneSetup::new()
        .get("/greet", greet())
        .router(Arc::new(router))
        .build();

    tester
        .perform(get("/elsewhere"))
        .unwrap()
        .and_expect(handler::name("fallback"))
        .and_expect(view::name("fallback"));
}

#[test]
fn test_json_view_content() {
    let tester = StandaloneSetup::new()
        .get(
            "/api/greet",
            FnController::shared("apiGreet", |_, _| {
                Ok(Some(
                    ModelAndView::with_view_name("json").attribute("message", "hi"),
                ))
            }),
        )
        .view_resolver(Arc::new(
            StaticViewResolver::new().view("json", Arc::new(JsonView::new())),
        ))
        .build();

    tester
        .perform(get("/api/greet").accept("application/json"))
        .unwrap()
        .and_expect(content::content_type("application/json"))
        .and_expect(content::json(json!({ "message": "hi" })))
        .and_expect(content::json_path("/message", "hi"));
}

#[test]
fn test_flash_survives_redirect_through_default_request() {
    let session = MockSession::new();
    let tester = StandaloneSetup::new()
        .post(
            "/items",
            FnController::shared("createItem", |request, _| {
                request.output_flash_map_mut().put("notice", "created");
                Ok(Some(ModelAndView::with_view_name("redirect:/items")))
            }),
        )
        .get(
            "/items",
            FnController::shared("listItems", |_, _| Ok(Some(ModelAndView::empty()))),
        )
        .default_request(get("/").session(session))
        .build();

    tester
        .perform(post("/items"))
        .unwrap()
        .and_expect(status::is_found())
        .and_expect(redirected_url("/items"))
        .and_expect(flash::attribute("notice", "created"));

    tester
        .perform(get("/items"))
        .unwrap()
        .and_expect(request::attribute("notice", "created"))
        .and_expect(view::name("items"));
}

#[test]
fn test_print_to_captures_full_report() {
    let tester = StandaloneSetup::new().get("/greet", greet()).build();
    let mut buffer = Vec::new();

    tester
        .perform(get("/greet?name=World"))
        .unwrap()
        .and_do(print_to(&mut buffer))
        .unwrap();

    let report = String::from_utf8(buffer).unwrap();
    assert!(report.contains("Request URI = /greet"));
    assert!(report.contains("Name = greet"));
    assert!(report.contains("View name = greeting"));
    assert!(report.contains("Status = 200"));
}

#[test]
fn test_build_error_surfaces_before_dispatch() {
    let tester = StandaloneSetup::new().get("/greet", greet()).build();

    let err = tester
        .perform(get("/greet/{id}"))
        .unwrap_err();
    assert!(matches!(
        err,
        TestError::MockMvc(MockMvcError::Build(RequestBuildError::MissingUriVariable { .. }))
    ));
}

#[test]
fn test_tester_shared_across_threads() {
    let tester = StandaloneSetup::new().get("/greet", greet()).build();

    let handles: Vec<_> = ["Ann", "Bo", "Cy"]
        .into_iter()
        .map(|name| {
            let tester = tester.clone();
            std::thread::spawn(move || {
                tester
                    .perform(get("/greet").param("name", name))
                    .unwrap()
                    .and_expect(model::attribute("message", format!("Hello, {name}")));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
