use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::city_info::CityInfo;
use crate::collect::global_variables::HTML_FILENAME;

const TEMPLATE: &str = include_str!("map_page.html");

/// Window and page title for `city`
pub fn title(city: &str) -> String {
    format!("3D MapTiler/OSM Map + Satellite Terrain – {}", city)
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JavaScript string literal, safe inside a `<script>` block
pub fn js_string(text: &str) -> String {
    // a JSON string is a valid JS string; `<` is escaped so `</script>` cannot close the block
    serde_json::Value::from(text)
        .to_string()
        .replace('<', "\\u003c")
}

/// Replace every `{{name}}` of `template` in a single pass.
///
/// Substituted values are never rescanned, and unknown names are left as is.
pub fn render_template<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// The map page for one city
pub struct MapPage<'a> {
    pub info: &'a CityInfo,
    pub api_key: &'a str,
    /// GeoJSON file name, relative to the page
    pub geojson_filename: &'a str,
}

impl MapPage<'_> {
    pub fn render(&self) -> String {
        let info = self.info;
        render_template(TEMPLATE, |name| {
            let value = match name {
                "city" => escape_html(&info.city),
                "lat" => info.lat.to_string(),
                "lon" => info.lon.to_string(),
                "lat_display" => format!("{:.5}", info.lat),
                "lon_display" => format!("{:.5}", info.lon),
                "country" => escape_html(&info.country),
                "region" => escape_html(&info.region),
                "population" => escape_html(&info.population),
                "temp" => escape_html(&info.temp),
                "wind" => escape_html(&info.wind),
                "api_key" => js_string(self.api_key),
                "geojson_url" => js_string(self.geojson_filename),
                _ => return None,
            };
            Some(value)
        })
    }

    /// Write the page as `temp_map_viewer.html` in `dir`
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(HTML_FILENAME);
        std::fs::write(&path, self.render())
            .with_context(|| format!("Failed to write HTML file: {}", path.display()))?;
        log::info!("Temporary HTML file created: {}.", path.display());
        Ok(path)
    }
}
