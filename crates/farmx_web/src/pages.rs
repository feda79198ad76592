//! Server-rendered HTML pages
//!
//! Every page shares one layout: title, tab bar, sidebar theme selector
//! and footer. User-supplied text is always passed through [`escape`].

use crate::charts;
use crate::forms::{
    CompareNutrientForm, CompareYieldForm, FieldSpec, NutrientForm, YieldForm, NUTRIENT_FIELDS,
    YIELD_FIELDS,
};
use farmx_core::{crops, Crop, NutrientInputs, NutrientReport, YieldInputs};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Page background theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Green,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Default, Theme::Green];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "default" => Some(Theme::Default),
            "green" => Some(Theme::Green),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Green => "green",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::Green => "Green",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Theme::Default => "white",
            Theme::Green => "#18453B",
        }
    }
}

/// Input mode of the prediction tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Single,
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Yield,
    Nitrogen,
    Resources,
    Faq,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Home, Tab::Yield, Tab::Nitrogen, Tab::Resources, Tab::Faq];

    fn path(self) -> &'static str {
        match self {
            Tab::Home => "/",
            Tab::Yield => "/yield",
            Tab::Nitrogen => "/nitrogen",
            Tab::Resources => "/resources",
            Tab::Faq => "/faq",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Yield => "Projected Yield",
            Tab::Nitrogen => "Soil Nitrogen",
            Tab::Resources => "Resources",
            Tab::Faq => "FAQ",
        }
    }
}

/// Result of a form submission as shown on the page
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Nothing submitted yet
    Blank,
    Done(T),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldResult {
    pub crop: Crop,
    pub inputs: YieldInputs,
    pub yield_kg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutrientResult {
    pub crop: Crop,
    pub inputs: NutrientInputs,
    pub report: NutrientReport,
}

/// External resources linked from the Resources tab
pub const RESOURCES: [(&str, &str); 6] = [
    ("Soil Testing - MSU", "https://homesoiltest.msu.edu/get-started"),
    (
        "NPK Fertilizer Calculator",
        "https://aesl.ces.uga.edu/soil/fertcalc/",
    ),
    (
        "United States Department of Agriculture",
        "https://www.usda.gov/",
    ),
    (
        "Minority and Women Farmers and Ranchers",
        "https://www.fsa.usda.gov/programs-and-services/farm-loan-programs/minority-and-women-farmers-and-ranchers/index",
    ),
    ("Soil Health Institute", "https://soilhealthinstitute.org/"),
    (
        "How much is too much for the climate?",
        "https://msutoday.msu.edu/news/2014/how-much-fertilizer-is-too-much-for-the-climate",
    ),
];

pub const FAQ: [(&str, &str); 3] = [
    (
        "How to interpret soil nutrient levels?",
        "Soil nutrient levels indicate the availability of essential nutrients like Nitrogen (N), Phosphorus (P), and Potassium (K). Optimal levels ensure healthy crop growth.",
    ),
    (
        "When should I apply fertilizers?",
        "Fertilizers should be applied based on soil test results and crop requirements. Typically, application is done during planting and mid-growth stages.",
    ),
    (
        "How to use FarmX for best results?",
        "Regularly input your soil test data, monitor nutrient levels, and follow the fertilizer recommendations provided by FarmX to maintain optimal soil health.",
    ),
];

pub const FOOTER: &str = "© 2024 FarmX. All rights reserved.";

/// Escape text for use in HTML content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(theme: Theme, active: Tab, mode: Option<Mode>, body: &str) -> String {
    let mut tabs = String::new();
    for tab in Tab::ALL {
        let class = if tab == active { " class=\"active\"" } else { "" };
        let _ = write!(
            tabs,
            r#"<a href="{path}?theme={theme}"{class}>{title}</a>"#,
            path = tab.path(),
            theme = theme.as_str(),
            title = tab.title(),
        );
    }

    let mut options = String::new();
    for choice in Theme::ALL {
        let selected = if choice == theme { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{value}"{selected}>{label}</option>"#,
            value = choice.as_str(),
            label = choice.label(),
        );
    }
    let mode_input = match mode {
        Some(Mode::Compare) => r#"<input type="hidden" name="mode" value="compare">"#,
        Some(Mode::Single) => r#"<input type="hidden" name="mode" value="single">"#,
        None => "",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>FarmX</title>
<link rel="icon" href="/assets/favicon.png">
<style>
body {{ background-color: {background}; color: black; font-family: sans-serif; margin: 0; }}
main {{ margin-left: 240px; padding: 1rem 2rem; }}
aside {{ position: fixed; width: 200px; top: 0; bottom: 0; padding: 1rem; background: #f0f2f6; }}
nav a {{ margin-right: 1rem; padding: 0.5rem; text-decoration: none; color: black; }}
nav a.active {{ border-bottom: 3px solid #ff4b4b; }}
.success {{ background: #dff0d8; padding: 1rem; }}
.error {{ background: #f8d7da; padding: 1rem; }}
.columns {{ display: flex; gap: 2rem; }}
.columns > div {{ flex: 1; }}
label {{ display: block; margin-top: 0.5rem; }}
footer {{ text-align: center; margin-top: 2rem; }}
</style>
</head>
<body>
<aside><h3>Customize Your Experience</h3>
<form method="get" action="{path}"><label for="theme">Choose Theme</label>
<select id="theme" name="theme">{options}</select>{mode_input}
<button type="submit">Apply</button></form></aside>
<main>
<h1>FarmX</h1>
<nav>{tabs}</nav>
{body}
<hr>
<footer><p>{FOOTER}</p></footer>
</main>
</body>
</html>
"#,
        background = theme.background(),
        path = active.path(),
    )
}

pub fn home(theme: Theme) -> String {
    let body = r#"<img src="/assets/logo.png" alt="FarmX logo" style="width: 100%;">
<h2 style="text-align: center;">Predicts how you can enrich your precious soil, while informing you of its potential bounty.</h2>
<h3 style="text-align: center;">A farmer's dream, manifest.</h3>"#;
    layout(theme, Tab::Home, None, body)
}

pub fn resources(theme: Theme) -> String {
    let mut body = String::from("<h2>Resources</h2>\n");
    for (label, url) in RESOURCES {
        let _ = writeln!(
            body,
            r#"<p><a class="button" href="{url}" target="_blank" rel="noopener noreferrer">{label}</a></p>"#,
            url = escape(url),
            label = escape(label),
        );
    }
    layout(theme, Tab::Resources, None, &body)
}

pub fn faq(theme: Theme) -> String {
    let mut body = String::from("<h2>Frequently Asked Questions</h2>\n");
    for (question, answer) in FAQ {
        let _ = writeln!(
            body,
            "<details><summary>{}</summary><p>{}</p></details>",
            escape(question),
            escape(answer)
        );
    }
    layout(theme, Tab::Faq, None, &body)
}

fn mode_links(out: &mut String, tab: Tab, theme: Theme, compare_label: &str) {
    let _ = write!(
        out,
        r#"<p><a href="{path}?mode=single&amp;theme={theme}">Single Crop Prediction</a> | <a href="{path}?mode=compare&amp;theme={theme}">{compare_label}</a></p>"#,
        path = tab.path(),
        theme = theme.as_str(),
    );
}

fn crop_select(out: &mut String, name: &str, label: &str, selected: &str) {
    let _ = write!(
        out,
        r#"<label for="{name}">{label}</label><select id="{name}" name="{name}"><option value="">Select a crop</option>"#
    );
    for crop in crops::all() {
        let marker = if crop.name == selected.trim() { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{name}"{marker}>{name}</option>"#,
            name = crop.name
        );
    }
    out.push_str("</select>");
}

fn number_input(out: &mut String, field: &FieldSpec, suffix: &str, label_suffix: &str, value: &str) {
    let max = field
        .max
        .map(|max| format!(r#" max="{max}""#))
        .unwrap_or_default();
    let _ = write!(
        out,
        r#"<label for="{name}{suffix}">{label}{label_suffix}</label><input type="number" id="{name}{suffix}" name="{name}{suffix}" min="{min}"{max} step="{step}" value="{value}">"#,
        name = field.name,
        label = escape(field.label),
        min = field.min,
        step = field.step,
        value = escape(value),
    );
}

fn notice<T>(out: &mut String, outcome: &Outcome<T>, render: impl FnOnce(&mut String, &T)) {
    match outcome {
        Outcome::Blank => {}
        Outcome::Failed(message) => {
            let _ = write!(out, r#"<div class="error">{}</div>"#, escape(message));
        }
        Outcome::Done(result) => render(out, result),
    }
}

pub fn yield_single(theme: Theme, form: &YieldForm, outcome: &Outcome<YieldResult>) -> String {
    let mut body = String::from("<h2>Projected Yield</h2>");
    mode_links(&mut body, Tab::Yield, theme, "Compare Two Crops");
    let _ = write!(
        body,
        r#"<form method="post" action="/yield?theme={}">"#,
        theme.as_str()
    );
    crop_select(&mut body, "crop", "Select Crop", &form.crop);
    for field in &YIELD_FIELDS {
        number_input(&mut body, field, "", "", form.value(field));
    }
    body.push_str(r#"<p><button type="submit">Predict Yield</button></p></form>"#);

    notice(&mut body, outcome, |out, result| {
        let _ = write!(
            out,
            r#"<div class="success"><strong>Projected Yield for {}:</strong> {:.2} kg</div>"#,
            result.crop.name, result.yield_kg
        );
    });
    layout(theme, Tab::Yield, Some(Mode::Single), &body)
}

pub fn yield_compare(
    theme: Theme,
    form: &CompareYieldForm,
    outcome: &Outcome<[YieldResult; 2]>,
) -> String {
    let mut body = String::from("<h2>Projected Yield</h2>");
    mode_links(&mut body, Tab::Yield, theme, "Compare Two Crops");
    let _ = write!(
        body,
        r#"<form method="post" action="/yield/compare?theme={}">"#,
        theme.as_str()
    );
    for (index, (side, ordinal)) in form.sides().iter().zip(["First", "Second"]).enumerate() {
        let n = index + 1;
        let suffix = n.to_string();
        let _ = write!(body, "<h3>Crop {n}</h3>");
        crop_select(
            &mut body,
            &format!("crop{n}"),
            &format!("Select {ordinal} Crop"),
            &side.crop,
        );
        for field in &YIELD_FIELDS {
            number_input(&mut body, field, &suffix, &format!(" - Crop {n}"), side.value(field));
        }
    }
    body.push_str(r#"<p><button type="submit">Compare Yields</button></p></form>"#);

    notice(&mut body, outcome, |out, results| {
        out.push_str(r#"<div class="columns">"#);
        for result in results {
            let _ = write!(
                out,
                "<div><h3>{}</h3><p><strong>Grain Weight:</strong> {} kg</p><p><strong>Grain Moisture:</strong> {}%</p><p><strong>Harvested Area:</strong> {} ha</p><p><strong>Projected Yield:</strong> {:.2} kg</p></div>",
                result.crop.name,
                result.inputs.grain_weight,
                result.inputs.grain_moisture,
                result.inputs.harvested_area,
                result.yield_kg,
            );
        }
        out.push_str("</div>");
        let chart = charts::yield_comparison([
            (results[0].crop.name, results[0].yield_kg),
            (results[1].crop.name, results[1].yield_kg),
        ]);
        push_chart(out, &chart);
    });
    layout(theme, Tab::Yield, Some(Mode::Compare), &body)
}

fn push_chart(out: &mut String, chart: &charts::BarChart) {
    match chart.render_svg() {
        Ok(svg) => out.push_str(&svg),
        Err(err) => {
            tracing::warn!(error = %err, "chart rendering failed");
            let _ = write!(out, r#"<div class="error">{}</div>"#, escape(&err.to_string()));
        }
    }
}

fn nutrient_details(out: &mut String, result: &NutrientResult) {
    let _ = write!(
        out,
        "<p><strong>Temperature:</strong> {}°C</p><p><strong>Humidity:</strong> {}%</p><p><strong>Soil pH:</strong> {}</p><p><strong>Rainfall:</strong> {} mm</p>",
        result.inputs.temperature, result.inputs.humidity, result.inputs.ph, result.inputs.rainfall,
    );
}

pub fn nitrogen_single(
    theme: Theme,
    form: &NutrientForm,
    outcome: &Outcome<NutrientResult>,
) -> String {
    let mut body = String::from("<h2>Predicting Nitrogen Values</h2>");
    mode_links(&mut body, Tab::Nitrogen, theme, "Compare Two Crops");
    let _ = write!(
        body,
        r#"<form method="post" action="/nitrogen?theme={}">"#,
        theme.as_str()
    );
    crop_select(&mut body, "crop", "Select Crop", &form.crop);
    for field in &NUTRIENT_FIELDS {
        number_input(&mut body, field, "", "", form.value(field));
    }
    body.push_str(r#"<p><button type="submit">Predict Nitrogen</button></p></form>"#);

    notice(&mut body, outcome, |out, result| {
        let report = &result.report;
        let _ = write!(
            out,
            r#"<div class="success"><h3>Optimal Nitrogen Category for {}: {}</h3><p><strong>Predicted Nitrogen Value:</strong> {:.2} kg/ha</p><p><strong>Predicted K Category:</strong> {}</p><p><strong>Predicted P Category:</strong> {}</p></div>"#,
            result.crop.name,
            escape(&report.n_category),
            report.n_value,
            escape(&report.k_category),
            escape(&report.p_category),
        );
    });
    layout(theme, Tab::Nitrogen, Some(Mode::Single), &body)
}

pub fn nitrogen_compare(
    theme: Theme,
    form: &CompareNutrientForm,
    outcome: &Outcome<[NutrientResult; 2]>,
) -> String {
    let mut body = String::from("<h2>Predicting Nitrogen Values</h2>");
    mode_links(&mut body, Tab::Nitrogen, theme, "Compare Two Crops");
    let _ = write!(
        body,
        r#"<form method="post" action="/nitrogen/compare?theme={}">"#,
        theme.as_str()
    );
    for (index, (side, ordinal)) in form.sides().iter().zip(["First", "Second"]).enumerate() {
        let n = index + 1;
        let suffix = n.to_string();
        let _ = write!(body, "<h3>Crop {n}</h3>");
        crop_select(
            &mut body,
            &format!("crop{n}"),
            &format!("Select {ordinal} Crop"),
            &side.crop,
        );
        for field in &NUTRIENT_FIELDS {
            number_input(&mut body, field, &suffix, &format!(" - Crop {n}"), side.value(field));
        }
    }
    body.push_str(
        r#"<p><button type="submit">Compare Nitrogen Predictions</button></p></form>"#,
    );

    notice(&mut body, outcome, |out, results| {
        out.push_str(r#"<div class="columns">"#);
        for result in results {
            let report = &result.report;
            let _ = write!(out, "<div><h3>{}</h3>", result.crop.name);
            nutrient_details(out, result);
            let _ = write!(
                out,
                "<p><strong>Optimal Nitrogen Category:</strong> {}</p><p><strong>Predicted Nitrogen Value:</strong> {:.2} kg/ha</p><p><strong>Predicted K Category:</strong> {}</p><p><strong>Predicted P Category:</strong> {}</p></div>",
                escape(&report.n_category),
                report.n_value,
                escape(&report.k_category),
                escape(&report.p_category),
            );
        }
        out.push_str("</div>");
        let chart = charts::nitrogen_comparison([
            (results[0].crop.name, results[0].report.n_value),
            (results[1].crop.name, results[1].report.n_value),
        ]);
        push_chart(out, &chart);
    });
    layout(theme, Tab::Nitrogen, Some(Mode::Compare), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parsing() {
        assert_eq!(Theme::parse("Green"), Some(Theme::Green));
        assert_eq!(Theme::parse(" default "), Some(Theme::Default));
        assert_eq!(Theme::parse("purple"), None);
        assert_eq!(Theme::default(), Theme::Default);
    }

    #[test]
    fn escape_covers_markup() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn green_theme_sets_background() {
        let page = home(Theme::Green);
        assert!(page.contains("background-color: #18453B"));
        assert!(page.contains("A farmer's dream, manifest."));
        assert!(page.contains(FOOTER));
    }

    #[test]
    fn resources_open_in_new_tab() {
        let page = resources(Theme::Default);
        assert_eq!(page.matches(r#"target="_blank""#).count(), RESOURCES.len());
        assert!(page.contains("https://soilhealthinstitute.org/"));
    }

    #[test]
    fn faq_uses_expanders() {
        let page = faq(Theme::Default);
        assert_eq!(page.matches("<details>").count(), 3);
        assert!(page.contains("When should I apply fertilizers?"));
    }

    #[test]
    fn yield_form_echoes_values_and_selection() {
        let form = YieldForm {
            grain_weight: "50".into(),
            grain_moisture: "12".into(),
            harvested_area: "1".into(),
            crop: "maize".into(),
        };
        let page = yield_single(Theme::Green, &form, &Outcome::Blank);
        assert!(page.contains(r#"action="/yield?theme=green""#));
        assert!(page.contains(r#"<option value="maize" selected>"#));
        assert!(page.contains(r#"name="grain_weight" min="0" step="0.1" value="50""#));
        assert!(page.contains(r#"max="100""#));
        assert!(page.contains("Select a crop"));
    }

    #[test]
    fn failures_are_escaped() {
        let page = nitrogen_single(
            Theme::Default,
            &NutrientForm::default(),
            &Outcome::Failed("<script>".into()),
        );
        assert!(page.contains(r#"<div class="error">&lt;script&gt;</div>"#));
    }
}
