use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::schedule::ScheduleRecord;

pub const NO_RESULTS_MARKUP: &str = r#"<p class="text-xl font-inter text-gray-400 text-center col-span-full">No anime details found for the requested titles. Try adding more!</p>"#;

pub fn render_card(anime: &ScheduleRecord) -> String {
    let info = encode_text(&anime.next_episode_info);
    // Sentences carrying an episode number get the countdown style.
    let next_episode_display = if anime.next_episode_info.contains("Ep") {
        format!(
            r#"<div class="info-section next-episode-info">
            <i class="fas fa-clock mr-2"></i>
            <span class="value">{info}</span>
        </div>"#
        )
    } else {
        format!(
            r#"<div class="info-section">
            <i class="fas fa-info-circle mr-2"></i>
            <span class="value">{info}</span>
        </div>"#
        )
    };

    let site_url_display = match anime.site_url.as_deref().filter(|s| !s.is_empty()) {
        Some(url) => format!(
            r#"<div class="info-section">
            <i class="fas fa-external-link-alt mr-2"></i>
            <a href="{}" target="_blank" rel="noopener noreferrer" class="value text-purple-300 hover:underline">Anilist</a>
        </div>"#,
            encode_double_quoted_attribute(url)
        ),
        None => r#"<div class="info-section">
            <i class="fas fa-external-link-alt mr-2"></i>
            <span class="value text-gray-400">Not Available</span>
        </div>"#
            .to_string(),
    };

    format!(
        r#"
<div class="anime-card rounded-2xl shadow-xl p-5 flex flex-col items-center text-center">
    <img src="{cover}" alt="{alt} Cover" class="w-full object-cover rounded-lg mb-4 shadow-lg border-2 border-transparent">
    <h3 class="text-3xl font-poppins font-bold mb-2 leading-tight">{name}</h3>
    <div class="text-sm space-y-3 w-full">
        {next_episode_display}
        {site_url_display}
    </div>
</div>
"#,
        cover = encode_double_quoted_attribute(&anime.cover_image),
        alt = encode_double_quoted_attribute(&anime.display_name),
        name = encode_text(&anime.display_name),
    )
}

/// Cards in input order, or the no-results paragraph when nothing survived.
pub fn render_cards(records: &[ScheduleRecord]) -> String {
    if records.is_empty() {
        return NO_RESULTS_MARKUP.to_string();
    }
    records.iter().map(render_card).collect()
}

/// The host document: a loading indicator, a results container and an error
/// banner, each shown or hidden through the `hidden` class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePage {
    loading_visible: bool,
    results_visible: bool,
    error_visible: bool,
    results_markup: String,
}

impl Default for SchedulePage {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulePage {
    pub fn new() -> Self {
        Self {
            loading_visible: true,
            results_visible: false,
            error_visible: false,
            results_markup: String::new(),
        }
    }

    pub fn show_loading(&mut self) {
        self.loading_visible = true;
        self.results_visible = false;
        self.error_visible = false;
    }

    pub fn show_error(&mut self) {
        self.error_visible = true;
    }

    pub fn show_results(&mut self, markup: String) {
        self.results_markup = markup;
        self.loading_visible = false;
        self.results_visible = true;
    }

    pub fn is_loading_visible(&self) -> bool {
        self.loading_visible
    }

    pub fn is_results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn is_error_visible(&self) -> bool {
        self.error_visible
    }

    pub fn results_markup(&self) -> &str {
        &self.results_markup
    }

    pub fn render_document(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Anime Airing Schedule</title>
<style>
  .hidden {{ display: none; }}
  body {{ background: #1a202c; color: #e2e8f0; font-family: sans-serif; margin: 0; padding: 2rem; }}
  #anime-list-container {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1.5rem; }}
  #anime-list-container.hidden {{ display: none; }}
  .anime-card {{ background: #2d3748; border-radius: 1rem; padding: 1.25rem; text-align: center; }}
  .anime-card img {{ width: 100%; border-radius: 0.5rem; }}
  .next-episode-info {{ color: #fbd38d; }}
  .text-gray-400 {{ color: #a0aec0; }}
</style>
</head>
<body>
<h1>Anime Airing Schedule</h1>
<div id="loading" class="{loading}">Loading anime details...</div>
<div id="error-message" class="{error}">Some anime details could not be loaded. Please try again later.</div>
<div id="anime-list-container" class="{results}">{markup}</div>
</body>
</html>
"#,
            loading = visibility(self.loading_visible),
            error = visibility(self.error_visible),
            results = visibility(self.results_visible),
            markup = self.results_markup,
        )
    }
}

fn visibility(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        "hidden"
    }
}
