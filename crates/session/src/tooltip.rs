/// What the tooltip says about one country.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub name: String,
    pub year: i32,
    pub value: Option<f64>,
}

impl TooltipContent {
    pub fn value_line(&self) -> String {
        match self.value {
            Some(v) if !v.is_nan() => format!("{v:.2} t CO₂ per person"),
            _ => "No data".to_string(),
        }
    }

    pub fn year_line(&self) -> String {
        format!("Year: {}", self.year)
    }

    pub fn to_html(&self) -> String {
        format!(
            "<strong>{}</strong><br/>{}<br/>{}",
            escape_html(&self.name),
            self.year_line(),
            self.value_line()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipState {
    pub visible: bool,
    pub content: Option<TooltipContent>,
    pub left: f64,
    pub top: f64,
}

impl TooltipState {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn place(&mut self, content: TooltipContent, page_x: f64, page_y: f64, offset: f64) {
        self.content = Some(content);
        self.left = page_x + offset;
        self.top = page_y + offset;
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
