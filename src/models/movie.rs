use serde::{Deserialize, Serialize};

/// A catalog entry as returned by the movie search and discovery endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl Movie {
    /// Joins the poster path onto `image_base`. The path is appended as-is
    /// after a `/`, so catalog paths that already start with one keep it.
    #[must_use]
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{}/{}", image_base.trim_end_matches('/'), path))
    }

    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| y.len() == 4)
    }

    /// Rating rounded to one decimal, the way movie cards display it.
    #[must_use]
    pub fn rating_label(&self) -> String {
        self.vote_average
            .filter(|v| *v > 0.0)
            .map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(poster: Option<&str>, date: Option<&str>) -> Movie {
        Movie {
            id: 1,
            title: "Dune".to_string(),
            poster_path: poster.map(str::to_string),
            popularity: 10.0,
            vote_average: Some(7.84),
            release_date: date.map(str::to_string),
            original_language: Some("en".to_string()),
            overview: None,
        }
    }

    #[test]
    fn test_poster_url_keeps_catalog_path() {
        let m = movie(Some("/abc.jpg"), None);
        assert_eq!(
            m.poster_url("https://image.tmdb.org/t/p/w500/").as_deref(),
            Some("https://image.tmdb.org/t/p/w500//abc.jpg")
        );
        assert!(movie(None, None).poster_url("x").is_none());
    }

    #[test]
    fn test_release_year() {
        assert_eq!(movie(None, Some("2021-09-15")).release_year(), Some("2021"));
        assert_eq!(movie(None, Some("")).release_year(), None);
        assert_eq!(movie(None, None).release_year(), None);
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(movie(None, None).rating_label(), "7.8");
        let mut unrated = movie(None, None);
        unrated.vote_average = Some(0.0);
        assert_eq!(unrated.rating_label(), "N/A");
    }

    #[test]
    fn test_deserialize_sparse_movie() {
        let m: Movie = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(m.id, 42);
        assert!(m.title.is_empty());
        assert!(m.poster_path.is_none());
    }
}
