use crate::models::{Recommendation, SimilarTitle, ANIME_GENRES, ANIME_TYPES};
use axum::response::Html;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    fn render(&self) -> String {
        let class = match self.kind {
            MessageKind::Error => "flash error",
            MessageKind::Success => "flash success",
        };
        format!("<div class=\"{}\">{}</div>\n", class, text(&self.text))
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #ccc;padding:.4rem;text-align:left}\
.flash{padding:.6rem;margin:1rem 0;border-radius:4px}.error{background:#fdd}.success{background:#dfd}\
form{margin:1rem 0}label{display:block;margin:.4rem 0}";

fn layout(title: &str, username: Option<&str>, message: Option<&Message>, body: &str) -> Html<String> {
    let mut html = String::with_capacity(body.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{} | Anime Recommender</title>\n", text(title)));
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    if let Some(name) = username {
        html.push_str(&format!(
            "<nav>Signed in as <strong>{}</strong> | <a href=\"/index\">Search</a> | <a href=\"/logout\">Log out</a></nav>\n",
            text(name)
        ));
    }
    html.push_str(&format!("<h1>{}</h1>\n", text(title)));
    if let Some(message) = message {
        html.push_str(&message.render());
    }
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    Html(html)
}

pub fn home(message: Option<&Message>) -> Html<String> {
    let body = "\
<section>\n<h2>Log in</h2>\n<form method=\"post\" action=\"/login\">\n\
<label>Username <input name=\"username\" required></label>\n\
<label>Password <input name=\"password\" type=\"password\" required></label>\n\
<button type=\"submit\">Log in</button>\n</form>\n</section>\n\
<section>\n<h2>Sign up</h2>\n<form method=\"post\" action=\"/signup\">\n\
<label>Username <input name=\"username\" required></label>\n\
<label>Password <input name=\"password\" type=\"password\" required></label>\n\
<button type=\"submit\">Create account</button>\n</form>\n</section>\n";

    layout("Anime Recommender", None, message, body)
}

fn options(choices: &[&str]) -> String {
    choices
        .iter()
        .map(|c| format!("<option value=\"{}\">{}</option>", attr(c), text(c)))
        .collect::<Vec<_>>()
        .join("")
}

pub fn index(username: &str, message: Option<&Message>) -> Html<String> {
    let body = format!(
        "<section>\n<h2>Find recommendations</h2>\n<form method=\"post\" action=\"/predict\">\n\
<label>Genre <select name=\"genre\">{}</select></label>\n\
<label>Type <select name=\"type\">{}</select></label>\n\
<label>Minimum rating <input name=\"min_rating\" type=\"number\" step=\"0.1\" min=\"0\" max=\"10\" value=\"7.5\" required></label>\n\
<button type=\"submit\">Recommend</button>\n</form>\n</section>\n\
<section>\n<h2>Find similar titles</h2>\n<form method=\"post\" action=\"/similar\">\n\
<label>Title <input name=\"title\" required></label>\n\
<button type=\"submit\">Find similar</button>\n</form>\n</section>\n",
        options(&ANIME_GENRES),
        options(&ANIME_TYPES)
    );

    layout("Anime Recommender", Some(username), message, &body)
}

pub fn results(username: &str, model_name: &str, recommendations: &[Recommendation]) -> Html<String> {
    let mut body = format!(
        "<p>Top {} picks, filtered by the {} model.</p>\n<table>\n<thead><tr><th>Name</th><th>Genre</th><th>Type</th><th>Rating</th></tr></thead>\n<tbody>\n",
        recommendations.len(),
        text(model_name)
    );
    for rec in recommendations {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
            text(&rec.name),
            text(&rec.genre),
            text(rec.kind.as_deref().unwrap_or("-")),
            rec.rating
        ));
    }
    body.push_str("</tbody>\n</table>\n<p><a href=\"/index\">New search</a></p>\n");

    layout("Recommendations", Some(username), None, &body)
}

pub fn similar(username: &str, title: &str, similar: &[SimilarTitle]) -> Html<String> {
    let mut body = format!("<p>Titles most similar to <strong>{}</strong>:</p>\n<ol>\n", text(title));
    for item in similar {
        body.push_str(&format!("<li>{} <small>({:.3})</small></li>\n", text(&item.name), item.score));
    }
    body.push_str("</ol>\n<p><a href=\"/index\">New search</a></p>\n");

    layout("Similar Titles", Some(username), None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_escape_names() {
        let recs = vec![Recommendation {
            name: "<script>alert(1)</script> & Friends".to_string(),
            genre: "Comedy".to_string(),
            kind: Some("TV".to_string()),
            rating: 8.5,
        }];
        let Html(page) = results("bob", "Random Forest", &recs);

        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; Friends"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("8.50"));
    }

    #[test]
    fn test_index_lists_choices() {
        let Html(page) = index("bob", Some(&Message::error("No recommendations found")));
        for genre in ANIME_GENRES {
            assert!(page.contains(&format!("<option value=\"{}\">", genre)));
        }
        assert!(page.contains("<option value=\"All\">All</option>"));
        assert!(page.contains("class=\"flash error\""));
    }

    #[test]
    fn test_home_has_both_forms() {
        let Html(page) = home(Some(&Message::success("Account created!")));
        assert!(page.contains("action=\"/login\""));
        assert!(page.contains("action=\"/signup\""));
        assert!(page.contains("Account created!"));
    }
}
