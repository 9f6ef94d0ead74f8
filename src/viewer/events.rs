//! Browser binding: mounts a table into a container element and wires the
//! pane scroll and wheel listeners.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use js_sys::Function;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, HtmlElement, WheelEvent};

use super::{DataTable, ScrollPane, SyncOutcome};
use crate::config::TableOptions;
use crate::fetch::JsDataSource;
use crate::types::Pane;

/// Spawns onto the browser microtask queue.
struct WasmSpawner;

impl LocalSpawn for WasmSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

/// A rendered pane element.
struct DomPane(HtmlElement);

impl ScrollPane for DomPane {
    fn scroll_top(&self) -> f64 {
        f64::from(self.0.scroll_top())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn set_scroll_top(&self, top: f64) {
        self.0.set_scroll_top(top.round() as i32);
    }

    fn client_height(&self) -> f64 {
        f64::from(self.0.client_height())
    }

    fn scroll_height(&self) -> f64 {
        f64::from(self.0.scroll_height())
    }
}

struct ViewState {
    table: DataTable<Value>,
    container: HtmlElement,
    /// Scroll listeners of the currently rendered panes.
    pane_closures: RefCell<Vec<(HtmlElement, Closure<dyn FnMut(Event)>)>>,
    wheel_closure: RefCell<Option<Closure<dyn FnMut(WheelEvent)>>>,
}

impl ViewState {
    fn render(self: &Rc<Self>) {
        let offset = self
            .table
            .scroll_sync()
            .is_registered(Pane::Center)
            .then(|| self.pane_element(Pane::Center))
            .flatten()
            .map(|el| el.scroll_top());

        self.unbind_panes();
        self.container.set_inner_html(&self.table.render_html());
        self.bind_panes();

        if let Some(top) = offset {
            if let Some(center) = self.pane_element(Pane::Center) {
                center.set_scroll_top(top);
                // Push the restored offset to the pinned panes.
                self.table.on_pane_scroll(Pane::Center, true);
            }
        }
    }

    fn pane_element(&self, pane: Pane) -> Option<HtmlElement> {
        let selector = format!(".table-container.{}", pane.as_str());
        self.container
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn bind_panes(self: &Rc<Self>) {
        let mut closures = self.pane_closures.borrow_mut();
        for pane in self.table.panes().iter() {
            let Some(element) = self.pane_element(pane) else {
                continue;
            };
            self.table
                .register_pane(pane, Rc::new(DomPane(element.clone())));

            let weak = Rc::downgrade(self);
            let closure = Closure::wrap(Box::new(move |event: Event| {
                if let Some(view) = weak.upgrade() {
                    let direct = event.target() == event.current_target();
                    view.table.on_pane_scroll(pane, direct);
                }
            }) as Box<dyn FnMut(Event)>);
            element
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
                .ok();
            closures.push((element, closure));
        }
    }

    fn unbind_panes(&self) {
        for (element, closure) in self.pane_closures.borrow_mut().drain(..) {
            element
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
                .ok();
        }
        for pane in Pane::ALL {
            self.table.unregister_pane(pane);
        }
    }

    fn bind_wheel(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
            let Some(view) = weak.upgrade() else {
                return;
            };
            // At the bottom the wheel is left to the page.
            if let SyncOutcome::Wheeled { .. } = view.table.on_wheel(event.delta_y()) {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(WheelEvent)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        self.container
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .ok();
        *self.wheel_closure.borrow_mut() = Some(closure);
    }
}

/// A paginated table rendered into a DOM element.
///
/// ```javascript
/// const view = new GridView(container, { rowKey: "id", columns }, query => api.fetch(query));
/// view.mount();
/// ```
#[wasm_bindgen]
pub struct GridView {
    state: Rc<ViewState>,
}

#[wasm_bindgen]
impl GridView {
    /// Create a view. `options` are table options as JSON-like object,
    /// `fetcher(query)` returns (a promise of) `{data, page, size, total}`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, options: JsValue, fetcher: Function) -> Result<GridView, JsValue> {
        console_error_panic_hook::set_once();
        super::logger::init_console();

        let options: TableOptions = serde_wasm_bindgen::from_value(options)?;
        let config = options.into_config::<Value>()?;
        let table = DataTable::new(config, JsDataSource::new(fetcher), WasmSpawner)?;

        let state = Rc::new(ViewState {
            table,
            container,
            pane_closures: RefCell::new(Vec::new()),
            wheel_closure: RefCell::new(None),
        });

        let weak = Rc::downgrade(&state);
        state.table.on_change(move |_| {
            if let Some(view) = weak.upgrade() {
                view.render();
            }
        });
        state.bind_wheel();
        Ok(GridView { state })
    }

    /// Render and issue the first fetch.
    pub fn mount(&self) {
        self.state.render();
        self.state.table.mount();
    }

    #[wasm_bindgen(js_name = setPage)]
    pub fn set_page(&self, page: u32) {
        self.state.table.set_page(page);
    }

    #[wasm_bindgen(js_name = setPageSize)]
    pub fn set_page_size(&self, size: u32) {
        let page = self.state.table.page();
        self.state.table.set_page_size(page, size);
    }

    pub fn reload(&self) {
        self.state.table.reload();
    }

    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&self, sort: Option<String>, filter: Option<String>) {
        self.state.table.set_query(sort, filter);
    }

    pub fn page(&self) -> u32 {
        self.state.table.page()
    }

    #[wasm_bindgen(js_name = pageSize)]
    pub fn page_size(&self) -> u32 {
        self.state.table.page_size()
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn total(&self) -> f64 {
        self.state.table.total() as f64
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.state.table.is_loading()
    }

    /// Pagination props as a plain object, or `undefined` when disabled.
    pub fn pagination(&self) -> Result<JsValue, JsValue> {
        match self.state.table.pagination() {
            Some(props) => Ok(serde_wasm_bindgen::to_value(&props)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Re-render from the current state.
    pub fn render(&self) {
        self.state.render();
    }

    /// Current markup, without touching the DOM.
    pub fn html(&self) -> String {
        self.state.table.render_html()
    }
}

impl Drop for GridView {
    fn drop(&mut self) {
        self.state.unbind_panes();
        if let Some(closure) = self.state.wheel_closure.borrow_mut().take() {
            self.state
                .container
                .remove_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())
                .ok();
        }
    }
}
