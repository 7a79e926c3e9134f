//! Project → card rendering.
//!
//! Each [`Project`] is written into a fresh instance of the card template.
//! For every optional field the matching slot is either filled or, when the
//! field is absent, removed from the card outright, so no empty regions are
//! left behind.
//!
//! All values come from third-party markup. Every one of them goes through
//! [`crate::sanitize`] immediately before it is assigned, with no exceptions:
//! text through `sanitize::text`, links and image sources through
//! `sanitize::url`, the language color through `sanitize::style`.

use crate::progressive::{ProgressiveImage, Stage};
use crate::sanitize;
use crate::template::{Element, Fragment, Template};
use crate::types::Project;
use url::Url;

pub const HEADING: &str = r#"[class="card-heading"]"#;
pub const DESCRIPTION: &str = r#"[class="card-description"]"#;
pub const LINK: &str = r#"[class="card-link"]"#;
pub const LANGUAGE: &str = r#"[class="card-language"]"#;
pub const LANGUAGE_COLOUR: &str = r#"[class="card-language-colour"]"#;
pub const LOGO: &str = r#"[class*="card-logo"]"#;
pub const FEATURE_IMAGE: &str = r#"[class="card-feature-image"]"#;

const DEFAULT_ALT: &str = "Feature image";

/// Render `project` into a detached card built from `template`.
///
/// `placeholder` is the local image every feature image starts on.
pub fn render(project: &Project, template: &Template, placeholder: &str) -> Fragment {
    let mut card = template.instantiate();
    let href = project.url.as_ref().map(Url::as_str);
    let language = project.programming_language.as_ref();

    fill(&mut card, HEADING, project.title.as_deref(), |el, title| {
        el.set_text(&sanitize::text(title));
    });
    fill(&mut card, DESCRIPTION, project.description.as_deref(), |el, desc| {
        el.set_text(&sanitize::text(desc));
    });
    fill(&mut card, LINK, href, |el, href| {
        el.set_attr("href", &sanitize::url(href));
    });
    fill(&mut card, LANGUAGE, language, |el, lang| {
        el.set_text(&sanitize::text(&lang.name));
    });
    fill(&mut card, LANGUAGE_COLOUR, language, |el, lang| {
        el.set_attr("style", &sanitize::style(&lang.style));
    });

    // Branding: host name as text, project URL as target.
    fill(&mut card, LOGO, Some(project.host), |el, host| {
        el.set_text(&sanitize::text(host.slug()));
        el.set_attr("data-host", &sanitize::text(host.slug()));
    });
    fill(&mut card, LOGO, href, |el, href| {
        el.set_attr("href", &sanitize::url(href));
    });

    fill(&mut card, FEATURE_IMAGE, project.image.as_ref(), |el, image| {
        el.set_attr(
            "alt",
            &sanitize::text(image.alt.as_deref().unwrap_or(DEFAULT_ALT)),
        );
        let loader = ProgressiveImage::new(placeholder, image, sanitize::url);
        el.set_attr("src", loader.current_src());
        el.set_attr("data-progressive", "");
        if let Some(low) = loader.src_for(Stage::LowRes) {
            el.set_attr("data-low-res-src", low);
        }
        if let Some(high) = loader.src_for(Stage::HighRes) {
            el.set_attr("data-high-res-src", high);
        }
    });

    card
}

/// Fill the slot matching `selector` with `content`, or remove the slot when
/// there is no content. Templates lacking the slot are left untouched.
fn fill<T>(
    card: &mut Fragment,
    selector: &str,
    content: Option<T>,
    set: impl FnOnce(&mut Element, T),
) {
    match content {
        Some(value) => {
            if let Some(el) = card.select_mut(selector) {
                set(el, value);
            }
        }
        None => {
            card.remove(selector);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Host, Image, Language};

    const PLACEHOLDER: &str = "/images/default.png";

    fn full_project() -> Project {
        Project {
            host: Host::GitHub,
            title: Some("dotfiles".to_string()),
            description: Some("My config".to_string()),
            url: Some(Url::parse("https://github.com/someone/dotfiles").unwrap()),
            image: Some(Image {
                high_res_src: Some("/images/github.png".to_string()),
                low_res_src: None,
                alt: Some("Github Logo".to_string()),
            }),
            programming_language: Some(Language {
                name: "Shell".to_string(),
                style: "background-color: #89e051".to_string(),
            }),
        }
    }

    #[test]
    fn fills_every_slot() {
        let card = render(&full_project(), &Template::card(), PLACEHOLDER);

        assert_eq!(card.select(HEADING).unwrap().text(), "dotfiles");
        assert_eq!(card.select(DESCRIPTION).unwrap().text(), "My config");
        assert_eq!(
            card.select(LINK).unwrap().attr("href"),
            Some("https://github.com/someone/dotfiles")
        );
        assert_eq!(card.select(LANGUAGE).unwrap().text(), "Shell");
        assert_eq!(
            card.select(LANGUAGE_COLOUR).unwrap().attr("style"),
            Some("background-color: #89e051")
        );
        let logo = card.select(LOGO).unwrap();
        assert_eq!(logo.text(), "github");
        assert_eq!(logo.attr("href"), Some("https://github.com/someone/dotfiles"));
    }

    #[test]
    fn feature_image_starts_on_placeholder() {
        let mut project = full_project();
        project.image = Some(Image {
            high_res_src: Some("full.png".to_string()),
            low_res_src: Some("thumb.png".to_string()),
            alt: None,
        });
        let card = render(&project, &Template::card(), PLACEHOLDER);
        let img = card.select(FEATURE_IMAGE).unwrap();

        assert_eq!(img.attr("src"), Some(PLACEHOLDER));
        assert_eq!(img.attr("data-low-res-src"), Some("thumb.png"));
        assert_eq!(img.attr("data-high-res-src"), Some("full.png"));
        assert_eq!(img.attr("alt"), Some("Feature image"));
    }

    #[test]
    fn high_res_only_has_no_low_res_attribute() {
        let card = render(&full_project(), &Template::card(), PLACEHOLDER);
        let img = card.select(FEATURE_IMAGE).unwrap();
        assert_eq!(img.attr("data-low-res-src"), None);
        assert_eq!(img.attr("data-high-res-src"), Some("/images/github.png"));
        assert_eq!(img.attr("alt"), Some("Github Logo"));
    }

    #[test]
    fn empty_alt_is_not_replaced() {
        let mut project = full_project();
        project.image.as_mut().unwrap().alt = Some(String::new());
        let card = render(&project, &Template::card(), PLACEHOLDER);
        assert_eq!(card.select(FEATURE_IMAGE).unwrap().attr("alt"), Some(""));
    }

    #[test]
    fn query_strings_survive_in_links_and_images() {
        let mut project = full_project();
        project.url = Some(Url::parse("https://cults3d.com/en/x?ref=1&copy=2").unwrap());
        project.image.as_mut().unwrap().high_res_src =
            Some("https://files.cults3d.com/a.png?w=1&not=3".to_string());
        let card = render(&project, &Template::card(), PLACEHOLDER);

        assert_eq!(
            card.select(LINK).unwrap().attr("href"),
            Some("https://cults3d.com/en/x?ref=1&copy=2")
        );
        assert_eq!(
            card.select(FEATURE_IMAGE).unwrap().attr("data-high-res-src"),
            Some("https://files.cults3d.com/a.png?w=1&not=3")
        );
        assert!(card.to_html().contains("?ref=1&amp;copy=2"));
    }

    #[test]
    fn absent_fields_remove_their_slots() {
        let project = Project::new(Host::Cults3d);
        let card = render(&project, &Template::card(), PLACEHOLDER);

        for slot in [HEADING, DESCRIPTION, LINK, LANGUAGE, LANGUAGE_COLOUR, LOGO, FEATURE_IMAGE] {
            assert!(card.select(slot).is_none(), "slot {slot} should be removed");
        }
        let html = card.to_html();
        assert!(!html.contains("card-description"));
        assert!(html.contains("card-footer"));
    }

    #[test]
    fn missing_description_only_removes_description() {
        let mut project = full_project();
        project.description = None;
        let card = render(&project, &Template::card(), PLACEHOLDER);
        assert!(card.select(DESCRIPTION).is_none());
        assert!(card.select(HEADING).is_some());
    }

    #[test]
    fn script_payloads_never_reach_output_unescaped() {
        let payload = "<script>alert('xss')</script>";
        let project = Project {
            host: Host::Cults3d,
            title: Some(format!("Nice {payload}")),
            description: Some(format!("&lt;script&gt;alert(1)&lt;/script&gt; {payload}")),
            url: Some(Url::parse("https://cults3d.com/x").unwrap()),
            image: Some(Image {
                high_res_src: Some("javascript:alert(1)".to_string()),
                low_res_src: Some(format!("\"><img src=x onerror=alert(1)>{payload}")),
                alt: Some(payload.to_string()),
            }),
            programming_language: Some(Language {
                name: payload.to_string(),
                style: format!("color: red; background: url(javascript:alert(1)){payload}"),
            }),
        };

        let html = render(&project, &Template::card(), PLACEHOLDER).to_html();
        assert!(!html.contains("<script>"), "{html}");
        assert!(!html.contains("javascript:"), "{html}");
        assert!(!html.contains("<img src=x"), "{html}");
        assert!(html.contains("Nice "));
    }

    #[test]
    fn template_without_slot_is_left_alone() {
        let template = Template::parse("minimal", r#"<div class="card-heading"></div>"#);
        let card = render(&full_project(), &template, PLACEHOLDER);
        assert_eq!(card.to_html(), r#"<div class="card-heading">dotfiles</div>"#);
    }
}
