//! Search-as-you-type
//!
//! Every input event trims the query and, when non-empty, fires one
//! `GET {endpoint}?q=...`. Requests are tagged with a sequence token and
//! only the latest one may render, so a slow response to an old query
//! cannot overwrite the results of a newer one.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use studydesk_protocol::{parse_hits, SearchHit};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlAnchorElement, HtmlElement, HtmlInputElement, Request, Response,
};

use crate::config::UiConfig;
use crate::dom::{find, get_window, ids, set_displayed};
use crate::error::{describe_js, Result, UiError};

/// Bytes `encodeURIComponent` leaves alone
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the request URL for a (trimmed, non-empty) query
pub fn search_url(endpoint: &str, query: &str) -> String {
    let sep = if endpoint.contains('?') { '&' } else { '?' };
    format!(
        "{endpoint}{sep}q={}",
        utf8_percent_encode(query, QUERY_COMPONENT)
    )
}

/// Where search results come from
#[async_trait(?Send)]
pub trait SearchBackend {
    async fn fetch_hits(&self, url: &str) -> Result<Vec<SearchHit>>;
}

/// Where search results go
pub trait ResultsView {
    /// Replace the list; an empty list hides the panel
    fn render(&self, hits: &[SearchHit]);
    /// Hide and empty the panel
    fn clear(&self);
    /// Hide the panel, keeping its contents
    fn hide(&self);
}

/// Monotonic request tags
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: Cell<u64>,
}

impl RequestSequence {
    /// Tag a new request; every older tag becomes stale
    pub fn advance(&self) -> u64 {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        next
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.latest.get() == token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query was blank; panel cleared, no request made
    Cleared,
    /// Results rendered
    Rendered(usize),
    /// A newer query superseded this one before it resolved
    Stale,
}

pub struct SearchController<B, V> {
    backend: B,
    view: V,
    endpoint: String,
    sequence: RequestSequence,
}

impl<B: SearchBackend, V: ResultsView> SearchController<B, V> {
    pub fn new(backend: B, view: V, endpoint: &str) -> Self {
        Self {
            backend,
            view,
            endpoint: endpoint.to_string(),
            sequence: RequestSequence::default(),
        }
    }

    /// Handle one input event
    ///
    /// The sequence token is taken before the returned future is first
    /// polled, so call order decides which response wins.
    pub fn on_input(&self, raw: &str) -> impl Future<Output = Result<SearchOutcome>> + '_ {
        let query = raw.trim();
        let token = self.sequence.advance();
        let url = if query.is_empty() {
            self.view.clear();
            None
        } else {
            Some(search_url(&self.endpoint, query))
        };

        async move {
            let Some(url) = url else {
                return Ok(SearchOutcome::Cleared);
            };
            let hits = self.backend.fetch_hits(&url).await?;
            if !self.sequence.is_current(token) {
                tracing::debug!(token, %url, "dropping stale search response");
                return Ok(SearchOutcome::Stale);
            }
            self.view.render(&hits);
            Ok(SearchOutcome::Rendered(hits.len()))
        }
    }

    /// A rendered link was clicked; the browser handles navigation
    pub fn on_link_click(&self) {
        self.view.hide();
    }
}

/// `window.fetch` backend
pub struct FetchBackend;

#[async_trait(?Send)]
impl SearchBackend for FetchBackend {
    async fn fetch_hits(&self, url: &str) -> Result<Vec<SearchHit>> {
        let win = get_window()?;
        let req = Request::new_with_str(url)?;
        let resp: Response = JsFuture::from(win.fetch_with_request(&req))
            .await?
            .dyn_into()?;

        if !resp.ok() {
            return Err(UiError::Http {
                status: resp.status(),
            });
        }

        let body = JsFuture::from(resp.text()?).await?;
        Ok(parse_hits(&body.as_string().unwrap_or_default())?)
    }
}

/// Results dropdown backed by `#search-results`
pub struct DomResults {
    doc: Document,
    container: HtmlElement,
}

impl DomResults {
    pub const fn new(doc: Document, container: HtmlElement) -> Self {
        Self { doc, container }
    }

    fn link(&self, hit: &SearchHit) -> Result<HtmlAnchorElement> {
        let a = self
            .doc
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(JsValue::from)?;
        a.set_href(&hit.url);
        a.set_text_content(Some(&hit.title));
        Ok(a)
    }
}

impl ResultsView for DomResults {
    fn render(&self, hits: &[SearchHit]) {
        self.container.set_inner_html("");
        for hit in hits {
            match self.link(hit) {
                Ok(a) => {
                    if let Err(e) = self.container.append_child(&a) {
                        tracing::warn!(
                            url = %hit.url,
                            error = %describe_js(&e),
                            "failed to attach search hit"
                        );
                    }
                }
                Err(e) => tracing::warn!(url = %hit.url, error = %e, "failed to render search hit"),
            }
        }
        set_displayed(&self.container, !hits.is_empty());
    }

    fn clear(&self) {
        set_displayed(&self.container, false);
        self.container.set_inner_html("");
    }

    fn hide(&self) {
        set_displayed(&self.container, false);
    }
}

/// Wire `#search-input` and `#search-results`; no-op if either is missing
pub fn mount(doc: &Document, config: &UiConfig) -> Result<()> {
    let (Some(input), Some(results)) = (
        find::<HtmlInputElement>(doc, ids::SEARCH_INPUT),
        find::<HtmlElement>(doc, ids::SEARCH_RESULTS),
    ) else {
        tracing::debug!("search widget not on this page");
        return Ok(());
    };

    let controller = Rc::new(SearchController::new(
        FetchBackend,
        DomResults::new(doc.clone(), results.clone()),
        &config.search_endpoint,
    ));

    let input_ctl = controller.clone();
    let input_el = input.clone();
    let on_input = Closure::wrap(Box::new(move |_e: Event| {
        let controller = input_ctl.clone();
        let raw = input_el.value();
        spawn_local(async move {
            match controller.on_input(&raw).await {
                Ok(outcome) => tracing::trace!(?outcome, "search input handled"),
                Err(e) => tracing::error!(error = %e, "search request failed"),
            }
        });
    }) as Box<dyn FnMut(_)>);
    input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    on_input.forget();

    let on_click = Closure::wrap(Box::new(move |e: Event| {
        let is_link = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("a").ok().flatten())
            .is_some();
        if is_link {
            controller.on_link_click();
        }
    }) as Box<dyn FnMut(_)>);
    results.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    tracing::debug!("search widget mounted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeBackend {
        requests: RefCell<Vec<String>>,
        responses: HashMap<String, Vec<SearchHit>>,
        fail: bool,
    }

    impl FakeBackend {
        fn with(url: &str, hits: Vec<SearchHit>) -> Self {
            let mut backend = Self::default();
            backend.responses.insert(url.to_string(), hits);
            backend
        }
    }

    #[async_trait(?Send)]
    impl SearchBackend for FakeBackend {
        async fn fetch_hits(&self, url: &str) -> Result<Vec<SearchHit>> {
            self.requests.borrow_mut().push(url.to_string());
            if self.fail {
                return Err(UiError::Http { status: 500 });
            }
            Ok(self.responses.get(url).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct FakeView {
        links: RefCell<Vec<(String, String)>>,
        visible: Cell<bool>,
    }

    impl ResultsView for FakeView {
        fn render(&self, hits: &[SearchHit]) {
            *self.links.borrow_mut() = hits
                .iter()
                .map(|h| (h.url.clone(), h.title.clone()))
                .collect();
            self.visible.set(!hits.is_empty());
        }

        fn clear(&self) {
            self.links.borrow_mut().clear();
            self.visible.set(false);
        }

        fn hide(&self) {
            self.visible.set(false);
        }
    }

    fn hit(url: &str, title: &str) -> SearchHit {
        SearchHit {
            url: url.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_search_url_matches_encode_uri_component() {
        assert_eq!(search_url("/search", "calendar"), "/search?q=calendar");
        assert_eq!(search_url("/search", "a b&c"), "/search?q=a%20b%26c");
        assert_eq!(search_url("/search", "it's (ok)!*~"), "/search?q=it's%20(ok)!*~");
        assert_eq!(search_url("/search", "成績"), "/search?q=%E6%88%90%E7%B8%BE");
        assert_eq!(search_url("/search?lang=zh", "x"), "/search?lang=zh&q=x");
    }

    #[test]
    fn test_non_empty_query_issues_one_request() {
        let backend = FakeBackend::with(
            "/search?q=grade%20book",
            vec![hit("/grades", "Grades"), hit("/notebook", "Notebook")],
        );
        let controller = SearchController::new(backend, FakeView::default(), "/search");
        let (backend, view) = (&controller.backend, &controller.view);

        let outcome = block_on(controller.on_input("  grade book ")).unwrap();

        assert_eq!(outcome, SearchOutcome::Rendered(2));
        assert_eq!(*backend.requests.borrow(), vec!["/search?q=grade%20book"]);
        assert_eq!(
            *view.links.borrow(),
            vec![
                ("/grades".to_string(), "Grades".to_string()),
                ("/notebook".to_string(), "Notebook".to_string()),
            ]
        );
        assert!(view.visible.get());
    }

    #[test]
    fn test_blank_query_clears_without_request() {
        let backend = FakeBackend::with("/search?q=cal", vec![hit("/calendar", "Calendar")]);
        let controller = SearchController::new(backend, FakeView::default(), "/search");
        let (backend, view) = (&controller.backend, &controller.view);

        block_on(controller.on_input("cal")).unwrap();
        assert!(view.visible.get());

        let outcome = block_on(controller.on_input("   ")).unwrap();
        assert_eq!(outcome, SearchOutcome::Cleared);
        assert_eq!(backend.requests.borrow().len(), 1);
        assert!(!view.visible.get());
        assert!(view.links.borrow().is_empty());
    }

    #[test]
    fn test_empty_result_hides_panel() {
        let backend = FakeBackend::default();
        let controller = SearchController::new(backend, FakeView::default(), "/search");
        let view = &controller.view;
        view.visible.set(true);

        let outcome = block_on(controller.on_input("nothing")).unwrap();
        assert_eq!(outcome, SearchOutcome::Rendered(0));
        assert!(!view.visible.get());
    }

    #[test]
    fn test_link_click_hides_panel() {
        let backend = FakeBackend::with("/search?q=q", vec![hit("/questions", "Questions")]);
        let controller = SearchController::new(backend, FakeView::default(), "/search");
        let view = &controller.view;

        block_on(controller.on_input("q")).unwrap();
        controller.on_link_click();
        assert!(!view.visible.get());
        assert_eq!(view.links.borrow().len(), 1);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut backend = FakeBackend::with("/search?q=ca", vec![hit("/cart", "Cart")]);
        backend
            .responses
            .insert("/search?q=cal".to_string(), vec![hit("/calendar", "Calendar")]);
        let controller = SearchController::new(backend, FakeView::default(), "/search");
        let (backend, view) = (&controller.backend, &controller.view);

        let older = controller.on_input("ca");
        let newer = controller.on_input("cal");

        // newer resolves first, older arrives late
        assert_eq!(block_on(newer).unwrap(), SearchOutcome::Rendered(1));
        assert_eq!(block_on(older).unwrap(), SearchOutcome::Stale);
        assert_eq!(view.links.borrow()[0].1, "Calendar");
        assert_eq!(backend.requests.borrow().len(), 2);
    }

    #[test]
    fn test_clearing_invalidates_in_flight_request() {
        let backend = FakeBackend::with("/search?q=cal", vec![hit("/calendar", "Calendar")]);
        let controller = SearchController::new(backend, FakeView::default(), "/search");
        let view = &controller.view;

        let pending = controller.on_input("cal");
        block_on(controller.on_input("")).unwrap();
        assert_eq!(block_on(pending).unwrap(), SearchOutcome::Stale);
        assert!(!view.visible.get());
    }

    #[test]
    fn test_backend_failure_leaves_view_untouched() {
        let backend = FakeBackend {
            fail: true,
            ..FakeBackend::default()
        };
        let controller = SearchController::new(backend, FakeView::default(), "/search");
        let view = &controller.view;

        let err = block_on(controller.on_input("cal")).unwrap_err();
        assert!(matches!(err, UiError::Http { status: 500 }));
        assert!(view.links.borrow().is_empty());
    }
}
