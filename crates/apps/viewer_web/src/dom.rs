use foundation::ids::ShapeId;
use layers::legend::Legend;
use layers::symbology::Color;
use session::Reaction;
use session::Session;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const GRADIENT_ID: &str = "legend-gradient";
/// Axis tick length and label gap, px.
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Handles to every page element the viewer writes to.
pub struct MapDom {
    paths: Vec<Element>,
    slider: HtmlInputElement,
    label: Element,
    tooltip: HtmlElement,
}

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id} element")))
}

fn svg(document: &Document, tag: &str) -> Result<Element, JsValue> {
    document.create_element_ns(Some(SVG_NS), tag)
}

fn set_attrs(el: &Element, attrs: &[(&str, &str)]) -> Result<(), JsValue> {
    for (name, value) in attrs {
        el.set_attribute(name, value)?;
    }
    Ok(())
}

impl MapDom {
    /// Builds the SVG (gradient, legend, one path per shape) inside
    /// `#map-container` and binds the slider, label and tooltip.
    pub fn build(document: &Document, session: &Session) -> Result<Self, JsValue> {
        let config = session.config();
        let container = by_id(document, "map-container")?;

        let root = svg(document, "svg")?;
        set_attrs(
            &root,
            &[
                ("width", &config.width.to_string()),
                ("height", &config.height.to_string()),
            ],
        )?;
        container.append_child(&root)?;

        let defs = svg(document, "defs")?;
        let ramp = gradient(document, session.legend())?;
        defs.append_child(&ramp)?;
        root.append_child(&defs)?;
        let legend = legend_group(document, session.legend())?;
        root.append_child(&legend)?;

        let countries = svg(document, "g")?;
        let stroke = session.layer().style().stroke.to_hex();
        let mut paths = Vec::with_capacity(session.layer().shapes().len());
        for shape in session.layer().shapes() {
            let path = svg(document, "path")?;
            set_attrs(
                &path,
                &[
                    ("d", &shape.path),
                    ("stroke", &stroke),
                    ("data-shape", &shape.id.0.to_string()),
                ],
            )?;
            countries.append_child(&path)?;
            paths.push(path);
        }
        root.append_child(&countries)?;

        let slider: HtmlInputElement = by_id(document, "year-slider")?.dyn_into()?;
        let label = by_id(document, "year-label")?;
        let tooltip: HtmlElement = by_id(document, "tooltip")?.dyn_into()?;

        let years = session.years();
        if let (Some(first), Some(latest)) = (years.first(), years.latest()) {
            slider.set_min(&first.to_string());
            slider.set_max(&latest.to_string());
            slider.set_step("1");
            slider.set_value(&latest.to_string());
            label.set_text_content(Some(&latest.to_string()));
        }

        Ok(Self {
            paths,
            slider,
            label,
            tooltip,
        })
    }

    pub fn paths(&self) -> &[Element] {
        &self.paths
    }

    pub fn slider(&self) -> &HtmlInputElement {
        &self.slider
    }

    pub fn apply_fills(&self, fills: &[(ShapeId, Color)]) {
        for (id, color) in fills {
            let Some(path) = self.paths.get(id.index()) else {
                continue;
            };
            if let Err(err) = path.set_attribute("fill", &color.to_hex()) {
                warn!(shape = id.0, "failed to set fill: {err:?}");
            }
        }
    }

    pub fn apply(&self, reaction: &Reaction) -> Result<(), JsValue> {
        let style = self.tooltip.style();
        match reaction {
            Reaction::YearLabel { year } => {
                self.label.set_text_content(Some(&year.to_string()));
                if self.slider.value() != year.to_string() {
                    self.slider.set_value(&year.to_string());
                }
            }
            Reaction::Restyled { .. } => {}
            Reaction::TooltipShown => style.set_property("opacity", "1")?,
            Reaction::TooltipMoved { html, left, top } => {
                self.tooltip.set_inner_html(html);
                style.set_property("left", &format!("{left}px"))?;
                style.set_property("top", &format!("{top}px"))?;
            }
            Reaction::TooltipHidden => style.set_property("opacity", "0")?,
        }
        Ok(())
    }
}

fn gradient(document: &Document, legend: &Legend) -> Result<Element, JsValue> {
    let gradient = svg(document, "linearGradient")?;
    set_attrs(
        &gradient,
        &[
            ("id", GRADIENT_ID),
            ("x1", "0%"),
            ("x2", "100%"),
            ("y1", "0%"),
            ("y2", "0%"),
        ],
    )?;
    for stop in &legend.stops {
        let el = svg(document, "stop")?;
        set_attrs(
            &el,
            &[
                ("offset", &stop.offset_percent()),
                ("stop-color", &stop.color.to_hex()),
            ],
        )?;
        gradient.append_child(&el)?;
    }
    Ok(gradient)
}

fn legend_group(document: &Document, legend: &Legend) -> Result<Element, JsValue> {
    let group = svg(document, "g")?;
    set_attrs(
        &group,
        &[
            ("id", "legend"),
            (
                "transform",
                &format!("translate({},{})", legend.origin.x, legend.origin.y),
            ),
        ],
    )?;

    let bar = svg(document, "rect")?;
    set_attrs(
        &bar,
        &[
            ("width", &legend.width.to_string()),
            ("height", &legend.height.to_string()),
            ("style", &format!("fill: url(#{GRADIENT_ID})")),
        ],
    )?;
    group.append_child(&bar)?;
    let ticks = axis(document, legend)?;
    group.append_child(&ticks)?;

    let title = svg(document, "text")?;
    set_attrs(
        &title,
        &[
            ("x", &(legend.width / 2.0).to_string()),
            ("y", "-6"),
            ("text-anchor", "middle"),
            ("font-size", "12"),
        ],
    )?;
    title.set_text_content(Some(&legend.title));
    group.append_child(&title)?;
    Ok(group)
}

/// Bottom-oriented axis under the legend bar.
fn axis(document: &Document, legend: &Legend) -> Result<Element, JsValue> {
    let group = svg(document, "g")?;
    set_attrs(
        &group,
        &[
            ("transform", &format!("translate(0,{})", legend.height)),
            ("fill", "none"),
            ("font-size", "10"),
            ("font-family", "sans-serif"),
            ("text-anchor", "middle"),
        ],
    )?;

    let domain = svg(document, "path")?;
    set_attrs(
        &domain,
        &[
            ("class", "domain"),
            ("stroke", "currentColor"),
            (
                "d",
                &format!("M0.5,{TICK_SIZE}V0.5H{}V{TICK_SIZE}", legend.width + 0.5),
            ),
        ],
    )?;
    group.append_child(&domain)?;

    for tick in &legend.ticks {
        let g = svg(document, "g")?;
        set_attrs(
            &g,
            &[
                ("class", "tick"),
                ("transform", &format!("translate({},0)", tick.x + 0.5)),
            ],
        )?;
        let line = svg(document, "line")?;
        set_attrs(
            &line,
            &[("stroke", "currentColor"), ("y2", &TICK_SIZE.to_string())],
        )?;
        let text = svg(document, "text")?;
        set_attrs(
            &text,
            &[
                ("fill", "currentColor"),
                ("y", &(TICK_SIZE + TICK_PADDING).to_string()),
                ("dy", "0.71em"),
            ],
        )?;
        text.set_text_content(Some(&tick.label));
        g.append_child(&line)?;
        g.append_child(&text)?;
        group.append_child(&g)?;
    }
    Ok(group)
}
