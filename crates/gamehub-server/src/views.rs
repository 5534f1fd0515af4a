//! HTML pages. Views only lay out the data they are handed.

use crate::form::{
    DESCRIPTION_FIELD, DOWNLOAD_PATH_FIELD, IMAGE_FIELD, NAME_FIELD, SCREENSHOT_SLOTS,
    screenshot_field,
};
use gamehub_core::{EntryDetails, RenderableEntry, RenderableSummary};
use maud::{DOCTYPE, Markup, html};

/// Site-wide values every page needs
#[derive(Debug, Clone)]
pub struct Site {
    pub title: String,
    /// Normalized mount prefix, empty at the root
    pub base_url: String,
}

impl Site {
    /// Where "back to the catalog" points
    pub fn root(&self) -> String {
        if self.base_url.is_empty() {
            "/".to_string()
        } else {
            self.base_url.clone()
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn layout(site: &Site, heading: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (heading) " - " (site.title) }
                link rel="stylesheet" href=(site.url("/static/style.css"));
            }
            body {
                header {
                    a href=(site.root()) { h1 { (site.title) } }
                    nav { a href=(site.url("/upload")) { "Upload a game" } }
                }
                main { (content) }
            }
        }
    }
}

pub fn index(site: &Site, games: &[RenderableSummary]) -> Markup {
    layout(
        site,
        "Catalog",
        html! {
            @if games.is_empty() {
                p.empty { "No games yet." }
            } @else {
                ul.catalog {
                    @for game in games {
                        li {
                            a href=(site.url(&format!("/game/{}", game.id))) {
                                @if let Some(cover) = &game.cover {
                                    img.cover src=(cover) alt=(game.name);
                                }
                                span.name { (game.name) }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn game(site: &Site, game: &RenderableEntry) -> Markup {
    layout(
        site,
        &game.name,
        html! {
            article.game {
                h2 { (game.name) }
                @if let Some(cover) = &game.cover {
                    img.cover src=(cover) alt=(game.name);
                }
                p.description { (game.description) }
                @if !game.screenshots.is_empty() {
                    section.screenshots {
                        @for shot in &game.screenshots {
                            img src=(shot) alt="Screenshot";
                        }
                    }
                }
                div.actions {
                    a.download href=(site.url(&format!("/download/{}", game.id))) { "Download" }
                    a href=(site.url(&format!("/edit/{}", game.id))) { "Edit" }
                    form method="post" action=(site.url(&format!("/delete/{}", game.id))) {
                        button type="submit" { "Delete" }
                    }
                }
            }
        },
    )
}

fn screenshot_inputs() -> Markup {
    html! {
        fieldset {
            legend { "Screenshots" }
            @for slot in 1..=SCREENSHOT_SLOTS {
                input type="file" name=(screenshot_field(slot)) accept="image/*";
            }
        }
    }
}

pub fn upload(site: &Site) -> Markup {
    layout(
        site,
        "Upload",
        html! {
            form method="post" action=(site.url("/upload-game")) enctype="multipart/form-data" {
                label { "Name" input type="text" name=(NAME_FIELD); }
                label { "Description" textarea name=(DESCRIPTION_FIELD) {} }
                label { "Download path" input type="text" name=(DOWNLOAD_PATH_FIELD); }
                label { "Cover image" input type="file" name=(IMAGE_FIELD) accept="image/*" required; }
                (screenshot_inputs())
                button type="submit" { "Upload" }
            }
        },
    )
}

pub fn edit(site: &Site, game: &EntryDetails) -> Markup {
    layout(
        site,
        &format!("Edit {}", game.name),
        html! {
            form method="post" action=(site.url(&format!("/update-game/{}", game.id))) enctype="multipart/form-data" {
                label { "Name" input type="text" name=(NAME_FIELD) value=(game.name); }
                label { "Description" textarea name=(DESCRIPTION_FIELD) { (game.description) } }
                label { "Download path" input type="text" name=(DOWNLOAD_PATH_FIELD) value=(game.download_path); }
                label { "Replace cover image" input type="file" name=(IMAGE_FIELD) accept="image/*"; }
                (screenshot_inputs())
                button type="submit" { "Save" }
            }
        },
    )
}
