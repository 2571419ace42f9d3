//! In-memory browser used by the integration tests
//!
//! A fake page is a set of selectors that exist. Every call is recorded so
//! tests can assert on exactly what the engine did.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use formrunner::browser::{BrowserSession, Element, SessionProvider};
use formrunner::core::{FormError, Result};

/// One recorded browser call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Navigate(String),
    Find(String),
    Click(String),
    Key { selector: String, key: char, delay: Duration },
    Sleep(Duration),
    Dispose,
}

#[derive(Debug, Default)]
pub struct PageState {
    pub present: HashSet<String>,
    pub calls: Vec<Call>,
    pub fail_navigation: bool,
    pub fail_click: HashSet<String>,
    pub panic_on_find: Option<String>,
}

/// Shared handle onto the fake page
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<PageState>>,
}

impl FakePage {
    pub fn with_elements(selectors: &[&str]) -> Self {
        let page = Self::default();
        page.state
            .lock()
            .unwrap()
            .present
            .extend(selectors.iter().map(|s| s.to_string()));
        page
    }

    pub fn fail_navigation(&self) {
        self.state.lock().unwrap().fail_navigation = true;
    }

    pub fn fail_click_on(&self, selector: &str) {
        self.state.lock().unwrap().fail_click.insert(selector.to_string());
    }

    pub fn panic_on_find(&self, selector: &str) {
        self.state.lock().unwrap().panic_on_find = Some(selector.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn finds(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Find(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Click(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Text typed into a selector, in keystroke order
    pub fn typed(&self, selector: &str) -> String {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Key { selector: s, key, .. } if s == selector => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn keystrokes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Key { .. }))
            .count()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Sleep(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn disposals(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Dispose))
            .count()
    }

    pub fn session(&self) -> FakeSession {
        FakeSession { page: self.clone() }
    }

    fn push(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

pub struct FakeSession {
    page: FakePage,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page.push(Call::Navigate(url.to_string()));
        if self.page.state.lock().unwrap().fail_navigation {
            return Err(FormError::navigation(url, "net::ERR_NAME_NOT_RESOLVED"));
        }
        Ok(())
    }

    async fn find_element(&mut self, selector: &str) -> Result<Element> {
        self.page.push(Call::Find(selector.to_string()));

        let state = self.page.state.lock().unwrap();
        if state.panic_on_find.as_deref() == Some(selector) {
            drop(state);
            panic!("driver crashed looking up {}", selector);
        }
        if state.present.contains(selector) {
            Ok(Element::new(selector))
        } else {
            Err(FormError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    async fn click(&mut self, element: &Element) -> Result<()> {
        self.page.push(Call::Click(element.selector().to_string()));
        if self
            .page
            .state
            .lock()
            .unwrap()
            .fail_click
            .contains(element.selector())
        {
            return Err(FormError::interaction(element.selector(), "element detached"));
        }
        Ok(())
    }

    async fn type_text(
        &mut self,
        element: &Element,
        text: &str,
        per_char_delay: Duration,
    ) -> Result<()> {
        for key in text.chars() {
            self.page.push(Call::Key {
                selector: element.selector().to_string(),
                key,
                delay: per_char_delay,
            });
        }
        Ok(())
    }

    async fn sleep(&mut self, duration: Duration) {
        self.page.push(Call::Sleep(duration));
    }

    async fn dispose(&mut self) -> Result<()> {
        self.page.push(Call::Dispose);
        Ok(())
    }
}

/// Provider handing out sessions onto one shared fake page
pub struct FakeProvider {
    pub page: FakePage,
}

impl FakeProvider {
    pub fn new(page: FakePage) -> Arc<Self> {
        Arc::new(Self { page })
    }
}

#[async_trait]
impl SessionProvider for FakeProvider {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>> {
        Ok(Box::new(self.page.session()))
    }
}
