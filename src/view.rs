//! UI state and its renderings.
//!
//! [`ViewState`] is everything a search page shows. The renderers are pure
//! functions of it; the results area has three mutually exclusive branches
//! with loading taking precedence over an error, and an error over results.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use std::fmt::Write;

use crate::clients::CatalogError;
use crate::constants::messages;
use crate::models::{Movie, SearchCountRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub input: String,
    pub debounced: String,
    pub movies: Vec<Movie>,
    pub trending: Vec<SearchCountRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum ResultsView<'a> {
    Loading,
    Error(&'a str),
    Movies(&'a [Movie]),
}

impl ViewState {
    #[must_use]
    pub fn results(&self) -> ResultsView<'_> {
        if self.loading {
            ResultsView::Loading
        } else if let Some(error) = self.error.as_deref().filter(|e| !e.is_empty()) {
            ResultsView::Error(error)
        } else {
            ResultsView::Movies(&self.movies)
        }
    }

    pub fn begin_fetch(&mut self, term: &str) {
        self.debounced = term.to_string();
        self.loading = true;
        self.error = None;
    }

    /// Folds a catalog response into the state.
    ///
    /// A rejected query empties the list and shows the service message. Any
    /// other failure shows the generic message and leaves the previous list
    /// in place behind it.
    pub fn apply_fetch(&mut self, result: &Result<Vec<Movie>, CatalogError>) {
        self.loading = false;

        match result {
            Ok(movies) => {
                self.movies = movies.clone();
                self.error = None;
            }
            Err(CatalogError::Rejected(message)) => {
                self.movies.clear();
                self.error = Some(
                    message
                        .clone()
                        .unwrap_or_else(|| messages::FETCH_FAILED.to_string()),
                );
            }
            Err(_) => {
                self.error = Some(messages::TRY_AGAIN_LATER.to_string());
            }
        }
    }
}

fn render_trending_html(out: &mut String, trending: &[SearchCountRecord]) {
    if trending.is_empty() {
        return;
    }

    out.push_str("<section class=\"trending\">\n<h2>Trending Movies</h2>\n<ul>\n");
    for (index, record) in trending.iter().enumerate() {
        let _ = writeln!(
            out,
            "<li data-id=\"{}\"><p>{}</p><img src=\"{}\" alt=\"{}\" /></li>",
            encode_double_quoted_attribute(&record.id),
            index + 1,
            encode_double_quoted_attribute(&record.poster_url),
            encode_double_quoted_attribute(&record.search_term),
        );
    }
    out.push_str("</ul>\n</section>\n");
}

fn render_movie_card_html(out: &mut String, movie: &Movie, image_base: &str) {
    let poster = movie
        .poster_url(image_base)
        .unwrap_or_else(|| "/assets/no-movie.svg".to_string());

    let _ = write!(
        out,
        "<li class=\"movie-card\" data-id=\"{}\"><img src=\"{}\" alt=\"{}\" /><h3>{}</h3><div class=\"content\"><span class=\"rating\">{}</span>",
        movie.id,
        encode_double_quoted_attribute(&poster),
        encode_double_quoted_attribute(&movie.title),
        encode_text(&movie.title),
        movie.rating_label(),
    );
    if let Some(lang) = movie.original_language.as_deref() {
        let _ = write!(out, "<span class=\"lang\">{}</span>", encode_text(lang));
    }
    let _ = writeln!(
        out,
        "<span class=\"year\">{}</span></div></li>",
        movie.release_year().unwrap_or("N/A")
    );
}

/// HTML for the dynamic part of the page: trending list and results area.
#[must_use]
pub fn render_html(state: &ViewState, image_base: &str) -> String {
    let mut out = String::new();

    render_trending_html(&mut out, &state.trending);

    out.push_str("<section class=\"all-movies\">\n<h2>All Movies</h2>\n");
    match state.results() {
        ResultsView::Loading => out.push_str("<div class=\"spinner\" role=\"status\"></div>\n"),
        ResultsView::Error(message) => {
            let _ = writeln!(out, "<p class=\"error\">{}</p>", encode_text(message));
        }
        ResultsView::Movies(movies) => {
            out.push_str("<ul>\n");
            for movie in movies {
                render_movie_card_html(&mut out, movie, image_base);
            }
            out.push_str("</ul>\n");
        }
    }
    out.push_str("</section>\n");

    out
}

/// Complete document: header, search box and the rendered state.
#[must_use]
pub fn render_page(state: &ViewState, image_base: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>Marquee</title>
<link rel="stylesheet" href="/assets/style.css" />
</head>
<body>
<main>
<div class="pattern"></div>
<div class="wrapper">
<header>
<h1>Find <span class="text-gradient">Movies</span> You'll Enjoy Without the Hassle</h1>
<form class="search" action="/" method="get">
<input type="text" name="query" id="search" placeholder="Search through thousands of movies" value="{}" autocomplete="off" />
</form>
</header>
<div id="view">
{}</div>
</div>
</main>
<script src="/assets/app.js" defer></script>
</body>
</html>
"#,
        encode_double_quoted_attribute(&state.input),
        render_html(state, image_base),
    )
}

/// Plain text rendering for the terminal.
#[must_use]
pub fn render_text(state: &ViewState) -> String {
    let mut out = String::new();

    if !state.trending.is_empty() {
        out.push_str("Trending Movies\n");
        let _ = writeln!(out, "{:-<60}", "");
        for (index, record) in state.trending.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>2}. {} ({} searches)",
                index + 1,
                record.search_term,
                record.count
            );
        }
        out.push('\n');
    }

    out.push_str("All Movies\n");
    let _ = writeln!(out, "{:-<60}", "");
    match state.results() {
        ResultsView::Loading => out.push_str("Loading...\n"),
        ResultsView::Error(message) => {
            let _ = writeln!(out, "{message}");
        }
        ResultsView::Movies([]) => out.push_str("No movies found.\n"),
        ResultsView::Movies(movies) => {
            for movie in movies {
                let _ = writeln!(
                    out,
                    "• {} ({}) ★ {} | {}",
                    movie.title,
                    movie.release_year().unwrap_or("N/A"),
                    movie.rating_label(),
                    movie.original_language.as_deref().unwrap_or("?"),
                );
            }
        }
    }

    out
}
