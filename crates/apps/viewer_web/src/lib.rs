use console_error_panic_hook::set_once;
use futures::future::try_join;
use gloo_net::http::Request;
use std::cell::{Cell, RefCell};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::ids::ShapeId;
use foundation::time::Time;
use formats::loader::{DataLoadError, DataSource, load_from_strs};
use runtime::event_bus::ViewerEvent;
use session::{InteractionController, PipelineError, Session, ViewerConfig};
use tracing::{error, info, warn};

mod dom;
mod logging;

use dom::MapDom;

/// Everything the page needs after load.
struct ViewerApp {
    controller: InteractionController,
    dom: MapDom,
}

thread_local! {
    static APP: RefCell<Option<ViewerApp>> = const { RefCell::new(None) };
    static FRAME_PENDING: Cell<bool> = const { Cell::new(false) };
}

#[derive(Debug)]
enum HostError {
    Pipeline(PipelineError),
    Dom(JsValue),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::Pipeline(e) => write!(f, "{e}"),
            HostError::Dom(e) => write!(f, "DOM error: {e:?}"),
        }
    }
}

impl From<PipelineError> for HostError {
    fn from(e: PipelineError) -> Self {
        HostError::Pipeline(e)
    }
}

impl From<DataLoadError> for HostError {
    fn from(e: DataLoadError) -> Self {
        HostError::Pipeline(PipelineError::Load(e))
    }
}

impl From<JsValue> for HostError {
    fn from(e: JsValue) -> Self {
        HostError::Dom(e)
    }
}

fn now() -> Time {
    let ms = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    Time::from_millis(ms)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Loads both data files and draws the map into `#map-container`.
///
/// `config_json` may override any [`ViewerConfig`] field.
#[wasm_bindgen]
pub fn load_co2_map(config_json: Option<String>) {
    let config = match config_json.as_deref().map(ViewerConfig::from_json_str) {
        None => ViewerConfig::default(),
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            logging::init("info");
            error!("{err}");
            return;
        }
    };
    logging::init(&config.log_level);

    spawn_local(async move {
        if let Err(err) = run(config).await {
            error!("error loading data: {err}");
        }
    });
}

async fn run(config: ViewerConfig) -> Result<(), HostError> {
    let (geojson, csv) = try_join(
        fetch_text(&config.world_url, DataSource::Geographic),
        fetch_text(&config.emissions_url, DataSource::Tabular),
    )
    .await?;

    let data = load_from_strs(&csv, &geojson)?;
    let session = Session::build(data, &config)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let dom = MapDom::build(&document, &session)?;
    let controller = InteractionController::new(session, now());

    bind_shape_events(&dom)?;
    bind_slider(&dom)?;
    APP.with(|app| *app.borrow_mut() = Some(ViewerApp { controller, dom }));
    request_frame();
    Ok(())
}

async fn fetch_text(url: &str, source: DataSource) -> Result<String, DataLoadError> {
    let fetch_err = |message: String| DataLoadError::Fetch { source, message };
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    if !resp.ok() {
        return Err(fetch_err(format!("{url}: HTTP {}", resp.status())));
    }
    let text = resp.text().await.map_err(|e| fetch_err(e.to_string()))?;
    info!("{source} loaded from {url} ({} bytes)", text.len());
    Ok(text)
}

/// Queues `event`, handles everything pending and applies the results.
fn dispatch(event: ViewerEvent) {
    let repaint = APP.with(|app| {
        let mut app = app.borrow_mut();
        let Some(app) = app.as_mut() else {
            return false;
        };
        let t = now();
        app.controller.emit(event);
        for reaction in app.controller.pump(t) {
            if let Err(err) = app.dom.apply(&reaction) {
                warn!("failed to update page: {err:?}");
            }
        }
        app.controller.needs_repaint(t)
    });
    if repaint {
        request_frame();
    }
}

fn bind_shape_events(dom: &MapDom) -> Result<(), JsValue> {
    for (i, path) in dom.paths().iter().enumerate() {
        let shape = ShapeId::new(i as u32);

        let on_over = Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
            dispatch(ViewerEvent::PointerEntered { shape });
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        let on_move = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
            dispatch(ViewerEvent::PointerMoved {
                shape,
                page_x: e.page_x() as f64,
                page_y: e.page_y() as f64,
            });
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        let on_out = Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
            dispatch(ViewerEvent::PointerLeft { shape });
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);

        path.add_event_listener_with_callback("mouseover", on_over.as_ref().unchecked_ref())?;
        path.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        path.add_event_listener_with_callback("mouseout", on_out.as_ref().unchecked_ref())?;
        // Listeners live as long as the page.
        on_over.forget();
        on_move.forget();
        on_out.forget();
    }
    Ok(())
}

fn bind_slider(dom: &MapDom) -> Result<(), JsValue> {
    let slider = dom.slider().clone();
    let on_input = Closure::wrap(Box::new(move |_e: web_sys::Event| {
        match slider.value().trim().parse::<f64>() {
            Ok(v) if v.is_finite() => dispatch(ViewerEvent::YearChanged {
                year: v.round() as i32,
            }),
            _ => warn!("ignoring slider value {:?}", slider.value()),
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    dom.slider()
        .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    on_input.forget();
    Ok(())
}

/// Schedules one animation frame unless one is already pending.
fn request_frame() {
    if FRAME_PENDING.with(|p| p.replace(true)) {
        return;
    }
    let Some(window) = web_sys::window() else {
        FRAME_PENDING.with(|p| p.set(false));
        return;
    };
    let closure = Closure::once(move |timestamp: f64| {
        FRAME_PENDING.with(|p| p.set(false));
        on_frame(Time::from_millis(timestamp));
    });
    if window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .is_err()
    {
        FRAME_PENDING.with(|p| p.set(false));
        return;
    }
    closure.forget();
}

fn on_frame(t: Time) {
    let animating = APP.with(|app| {
        let mut app = app.borrow_mut();
        let Some(app) = app.as_mut() else {
            return false;
        };
        let fills = app.controller.frame(t);
        app.dom.apply_fills(&fills);
        app.controller.needs_repaint(t)
    });
    if animating {
        request_frame();
    }
}
