//! DOM renderer
//!
//! Draws the level into the page: the static grid once as a `<table>`,
//! the actors every frame as absolutely positioned `<div>`s. Strictly
//! read-only over the simulation; all game state stays in `sim`.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::consts::SCALE;
use crate::sim::{Actor, ActorKind, Level, Status, Tile};

/// Create an element with an optional class
fn elt(document: &Document, name: &str, class: Option<&str>) -> Result<Element, JsValue> {
    let el = document.create_element(name)?;
    if let Some(class) = class {
        el.set_class_name(class);
    }
    Ok(el)
}

fn tile_class(tile: Tile) -> Option<&'static str> {
    match tile {
        Tile::Empty => None,
        Tile::Wall => Some("wall"),
        Tile::Lava => Some("lava"),
    }
}

fn actor_class(actor: &Actor) -> &'static str {
    match actor.kind {
        ActorKind::Player { .. } => "actor player",
        ActorKind::Coin { .. } => "actor coin",
        ActorKind::Lava { .. } => "actor lava",
    }
}

/// One level's view: a wrapper div holding the background table and a
/// per-frame actor layer
pub struct DomDisplay {
    wrap: Element,
    actor_layer: Option<Element>,
}

impl DomDisplay {
    /// Build the display under `parent` and draw the first frame
    pub fn new(document: &Document, parent: &Element, level: &Level) -> Result<Self, JsValue> {
        let wrap = elt(document, "div", Some("game"))?;
        parent.append_child(&wrap)?;
        wrap.append_child(&draw_background(document, level)?)?;

        let mut display = Self {
            wrap,
            actor_layer: None,
        };
        display.draw_frame(document, level)?;
        Ok(display)
    }

    /// Redraw the actor layer and status styling for the current frame
    pub fn draw_frame(&mut self, document: &Document, level: &Level) -> Result<(), JsValue> {
        if let Some(layer) = self.actor_layer.take() {
            self.wrap.remove_child(&layer)?;
        }
        let layer = draw_actors(document, level)?;
        self.wrap.append_child(&layer)?;
        self.actor_layer = Some(layer);

        self.wrap.set_class_name(match level.status() {
            Status::Playing => "game",
            Status::Lost => "game lost",
            Status::Won => "game won",
        });

        self.scroll_player_into_view(level);
        Ok(())
    }

    /// Scroll the wrapper so the player stays inside the middle third of
    /// the viewport
    fn scroll_player_into_view(&self, level: &Level) {
        let width = self.wrap.client_width() as f64;
        let height = self.wrap.client_height() as f64;
        let margin = width / 3.0;

        let left = self.wrap.scroll_left() as f64;
        let right = left + width;
        let top = self.wrap.scroll_top() as f64;
        let bottom = top + height;

        let Some(player) = level.player() else {
            return;
        };
        let center = (player.pos + player.size * 0.5).as_dvec2() * SCALE;

        if center.x < left + margin {
            self.wrap.set_scroll_left((center.x - margin) as i32);
        } else if center.x > right - margin {
            self.wrap.set_scroll_left((center.x + margin - width) as i32);
        }
        if center.y < top + margin {
            self.wrap.set_scroll_top((center.y - margin) as i32);
        } else if center.y > bottom - margin {
            self.wrap.set_scroll_top((center.y + margin - height) as i32);
        }
    }

    /// Remove the display from the page (level finished)
    pub fn clear(&self) {
        if let Some(parent) = self.wrap.parent_node() {
            let _ = parent.remove_child(&self.wrap);
        }
    }
}

/// Draw the static grid as a table; called once per level
fn draw_background(document: &Document, level: &Level) -> Result<Element, JsValue> {
    let table = elt(document, "table", Some("background"))?;
    table.set_attribute(
        "style",
        &format!("width:{}px", level.width() as f64 * SCALE),
    )?;

    for y in 0..level.height() {
        let row = elt(document, "tr", None)?;
        row.set_attribute("style", &format!("height:{SCALE}px"))?;
        for x in 0..level.width() {
            row.append_child(&elt(document, "td", tile_class(level.tile(x, y)))?)?;
        }
        table.append_child(&row)?;
    }
    Ok(table)
}

/// Draw every actor as a positioned div; rebuilt each frame
fn draw_actors(document: &Document, level: &Level) -> Result<Element, JsValue> {
    let wrap = elt(document, "div", None)?;
    for actor in level.actors() {
        let rect = elt(document, "div", Some(actor_class(actor)))?;
        rect.set_attribute(
            "style",
            &format!(
                "width:{}px;height:{}px;left:{}px;top:{}px",
                actor.size.x as f64 * SCALE,
                actor.size.y as f64 * SCALE,
                actor.pos.x as f64 * SCALE,
                actor.pos.y as f64 * SCALE,
            ),
        )?;
        wrap.append_child(&rect)?;
    }
    Ok(wrap)
}
