// DOM overlays drawn on top of the canvas: HUD, intro screens, milestone
// cards and the win screen. Elements are created once; per-frame updates only
// touch them when the sequencer's overlay changes.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::{Result, ValentineError};
use crate::sequencer::{MILESTONES, Milestone, Overlay, PhotoLayout, Rect};
use crate::{LEADERBOARD, TODO_ITEMS};

const STYLE: &str = "
#vq-ui { position:fixed; inset:0; pointer-events:none; font-family:'Trebuchet MS', sans-serif; color:#fff; z-index:10; }
#vq-ui [hidden] { display:none !important; }
#vq-score { position:fixed; top:12px; left:50%; transform:translateX(-50%); margin:0; font-size:28px; text-shadow:0 0 10px rgba(255,107,157,0.8); }
#vq-hint { position:fixed; top:56px; left:50%; transform:translateX(-50%); margin:0; opacity:0.85; }
#vq-crosshair { position:fixed; left:50%; top:50%; width:14px; height:14px; margin:-7px 0 0 -7px; border:2px solid #ff6b9d; border-radius:50%; }
#vq-panel { position:fixed; top:12px; left:12px; padding:8px 14px; background:rgba(32,0,32,0.55); border:1px solid #ff6b9d; border-radius:8px; font-size:14px; }
#vq-panel h3 { margin:4px 0; color:#ffb3d9; }
#vq-panel ul { margin:0 0 6px 0; padding-left:18px; }
#vq-time { position:fixed; bottom:14px; left:50%; transform:translateX(-50%); padding:4px 10px; background:rgba(0,0,0,0.4); border-radius:6px; }
.vq-screen { position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(32,0,32,0.72); pointer-events:auto; transition:opacity 0.6s ease; }
.vq-card { text-align:center; max-width:560px; }
.vq-card img.vq-hero { max-width:220px; border-radius:12px; }
.vq-btn { margin:10px; padding:10px 26px; font-size:18px; border:none; border-radius:22px; background:#ff6b9d; color:#fff; cursor:pointer; transition:transform 0.08s linear; }
.vq-fading { opacity:0; }
.vq-text { font-size:26px; max-width:460px; text-shadow:0 0 12px rgba(255,107,157,0.8); }
.vq-photo { position:absolute; width:200px; border-radius:10px; box-shadow:0 0 18px rgba(255,107,157,0.6); }
.vq-left { left:6%; top:50%; transform:translateY(-50%); }
.vq-right { right:6%; top:50%; transform:translateY(-50%); }
.vq-top { top:4%; left:50%; transform:translateX(-50%); }
.vq-bottom { bottom:4%; left:50%; transform:translateX(-50%); }
.vq-tl { top:5%; left:5%; } .vq-tr { top:5%; right:5%; } .vq-bl { bottom:5%; left:5%; } .vq-br { bottom:5%; right:5%; }
.vq-orbit { position:absolute; left:50%; top:50%; width:0; height:0; animation:vq-spin 24s linear infinite; }
.vq-orbit .vq-photo { width:150px; transform:rotate(calc(var(--i) * 72deg)) translateY(-260px) rotate(calc(var(--i) * -72deg)); margin:-75px 0 0 -75px; }
@keyframes vq-spin { to { transform:rotate(360deg); } }
#vq-leaderboard ol { list-style:none; padding:0; }
#vq-leaderboard li { display:flex; gap:24px; justify-content:space-between; min-width:220px; padding:2px 0; }
#vq-stars { position:fixed; top:18%; left:50%; transform:translateX(-50%); font-size:48px; color:#ff6b9d; text-shadow:0 0 20px #ff6b9d; }
";

fn create(doc: &Document, tag: &str, id: &str, class: &str) -> Result<Element> {
    let el = doc.create_element(tag).map_err(ValentineError::dom)?;
    if !id.is_empty() {
        el.set_id(id);
    }
    if !class.is_empty() {
        el.set_class_name(class);
    }
    Ok(el)
}

fn append(parent: &Element, child: &Element) -> Result<()> {
    parent.append_child(child).map_err(ValentineError::dom)?;
    Ok(())
}

fn set_hidden(el: &Element, hidden: bool) {
    if hidden {
        el.set_attribute("hidden", "").ok();
    } else {
        el.remove_attribute("hidden").ok();
    }
}

/// Photo placement classes for a milestone card, one per image.
fn photo_classes(layout: PhotoLayout) -> &'static [&'static str] {
    match layout {
        PhotoLayout::Pair => &["vq-left", "vq-right"],
        PhotoLayout::BannerPair => &["vq-top", "vq-left", "vq-right"],
        PhotoLayout::Cross => &["vq-top", "vq-bottom", "vq-left", "vq-right"],
        PhotoLayout::Corners => &["vq-tl", "vq-tr", "vq-bl", "vq-br"],
        PhotoLayout::Orbit => &[],
    }
}

pub(crate) fn milestone_html(m: &Milestone) -> String {
    let mut html = String::new();
    if m.layout == PhotoLayout::Orbit {
        html.push_str("<div class='vq-orbit'>");
        for (i, src) in m.images.iter().enumerate() {
            html.push_str(&format!("<img class='vq-photo' style='--i:{i}' src='{src}' alt=''>"));
        }
        html.push_str("</div>");
    } else {
        for (src, class) in m.images.iter().zip(photo_classes(m.layout)) {
            html.push_str(&format!("<img class='vq-photo {class}' src='{src}' alt=''>"));
        }
    }
    html.push_str(&format!("<p class='vq-text'>{}</p>", m.message));
    html
}

pub(crate) fn leaderboard_html() -> String {
    let mut html = String::from("<p class='vq-text'>You will always be my number 1</p><ol>");
    for (rank, name) in LEADERBOARD.iter().enumerate() {
        html.push_str(&format!("<li><span>{}</span><span>{}</span></li>", rank + 1, name));
    }
    html.push_str("</ol>");
    html
}

pub(crate) struct Overlays {
    pub start: Element,
    pub yes: Element,
    pub no: HtmlElement,
    pub adventure: Element,
    pub go: Element,
    milestone: Element,
    shown_threshold: Option<u32>,
    pub win: Element,
    win_message: Element,
    leaderboard: Element,
    pub replay: Element,
    score: Element,
    hint: Element,
    crosshair: Element,
    time: Element,
    stars: Element,
    last: Option<Overlay>,
}

impl Overlays {
    pub fn build(doc: &Document) -> Result<Self> {
        let body = doc.body().ok_or(ValentineError::MissingElement("body"))?;
        let style = create(doc, "style", "vq-style", "")?;
        style.set_text_content(Some(STYLE));
        append(&body, &style)?;

        let ui = create(doc, "div", "vq-ui", "")?;
        append(&body, &ui)?;

        let score = create(doc, "h1", "vq-score", "")?;
        score.set_text_content(Some("Score: 0"));
        let hint = create(doc, "p", "vq-hint", "")?;
        hint.set_text_content(Some("Click the screen to start aiming!"));
        let crosshair = create(doc, "div", "vq-crosshair", "")?;
        let time = create(doc, "div", "vq-time", "")?;
        let stars = create(doc, "div", "vq-stars", "")?;
        stars.set_text_content(Some(crate::game::constellation::COMPLETION_MESSAGE));
        set_hidden(&stars, true);

        let panel = create(doc, "div", "vq-panel", "")?;
        let mut todo = String::from("<h3>To Do</h3><ul>");
        for item in TODO_ITEMS {
            todo.push_str(&format!("<li>{item}</li>"));
        }
        todo.push_str("</ul><h3>Keybinds</h3><ul><li>Use arrow keys to change time of day</li></ul>");
        panel.set_inner_html(&todo);

        for el in [&score, &hint, &crosshair, &panel, &time, &stars] {
            append(&ui, el)?;
        }

        // Start screen with the "no" button that runs away.
        let start = create(doc, "div", "vq-start", "vq-screen")?;
        let card = create(doc, "div", "", "vq-card")?;
        card.set_inner_html(
            "<img class='vq-hero' src='/images/start.png' alt=''>\
             <h2>Hey beautiful!!!</h2><p>Will you be my valentine??</p>",
        );
        let yes = create(doc, "button", "vq-yes", "vq-btn")?;
        yes.set_text_content(Some("yes"));
        let no: HtmlElement = create(doc, "button", "vq-no", "vq-btn")?
            .dyn_into()
            .map_err(|_| ValentineError::Dom("button is not an HtmlElement".into()))?;
        no.set_text_content(Some("no"));
        append(&card, &yes)?;
        append(&card, &no)?;
        append(&start, &card)?;
        append(&ui, &start)?;

        let adventure = create(doc, "div", "vq-adventure", "vq-screen")?;
        let card = create(doc, "div", "", "vq-card")?;
        card.set_inner_html(
            "<img class='vq-hero' src='/images/moshi.png' alt=''>\
             <p class='vq-text'>You better. Since you make even the most boring days feel like an \
             adventure, I am going to bring you on an adventure. Good Luck!</p>",
        );
        let go = create(doc, "button", "vq-go", "vq-btn")?;
        go.set_text_content(Some("Let's go!"));
        append(&card, &go)?;
        append(&adventure, &card)?;
        append(&ui, &adventure)?;

        let milestone = create(doc, "div", "vq-milestone", "vq-screen")?;
        append(&ui, &milestone)?;

        let win = create(doc, "div", "vq-win", "vq-screen")?;
        let win_message = create(doc, "h2", "", "vq-text")?;
        win_message.set_text_content(Some("Happy Valentine's Day, I love you so much"));
        let leaderboard = create(doc, "div", "vq-leaderboard", "vq-card")?;
        leaderboard.set_inner_html(&leaderboard_html());
        let replay = create(doc, "button", "vq-replay", "vq-btn")?;
        replay.set_text_content(Some("Replay"));
        append(&leaderboard, &replay)?;
        append(&win, &win_message)?;
        append(&win, &leaderboard)?;
        append(&ui, &win)?;

        Ok(Self {
            start,
            yes,
            no,
            adventure,
            go,
            milestone,
            shown_threshold: None,
            win,
            win_message,
            leaderboard,
            replay,
            score,
            hint,
            crosshair,
            time,
            stars,
            last: None,
        })
    }

    /// Current on-screen box of the "no" button.
    pub fn no_button_rect(&self) -> Rect {
        let r = self.no.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    pub fn set_no_offset(&self, (dx, dy): (f64, f64)) {
        self.no.style().set_property("transform", &format!("translate({dx}px, {dy}px)")).ok();
    }

    pub fn set_score(&self, score: u32) {
        self.score.set_text_content(Some(&format!("Score: {score}")));
    }

    pub fn set_time_label(&self, label: &str) {
        self.time.set_text_content(Some(&format!("Time of day: {label}")));
    }

    pub fn set_aiming(&self, aiming: bool, overlay_active: bool) {
        set_hidden(&self.hint, aiming || overlay_active);
        set_hidden(&self.crosshair, overlay_active);
    }

    pub fn show_constellation_message(&self, show: bool) {
        set_hidden(&self.stars, !show);
    }

    /// Reflect `overlay` in the DOM. Cheap when nothing changed.
    pub fn apply(&mut self, overlay: Overlay) {
        if self.last == Some(overlay) {
            return;
        }
        self.last = Some(overlay);
        set_hidden(&self.start, overlay != Overlay::StartScreen);
        set_hidden(&self.adventure, overlay != Overlay::AdventureScreen);
        set_hidden(&self.win, !matches!(overlay, Overlay::WinMessage | Overlay::WinLeaderboard));
        set_hidden(&self.win_message, overlay != Overlay::WinMessage);
        set_hidden(&self.leaderboard, overlay != Overlay::WinLeaderboard);

        match overlay {
            Overlay::MilestoneMessage { threshold, fading } => {
                if self.shown_threshold != Some(threshold) {
                    if let Some(m) = MILESTONES.iter().find(|m| m.threshold == threshold) {
                        self.milestone.set_inner_html(&milestone_html(m));
                    }
                    self.shown_threshold = Some(threshold);
                }
                let class = if fading { "vq-screen vq-fading" } else { "vq-screen" };
                self.milestone.set_class_name(class);
                set_hidden(&self.milestone, false);
            }
            _ => {
                set_hidden(&self.milestone, true);
                self.milestone.set_class_name("vq-screen");
                self.shown_threshold = None;
            }
        }
        if overlay == Overlay::StartScreen {
            self.set_no_offset((0.0, 0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_place_every_photo() {
        for m in MILESTONES.iter() {
            let html = milestone_html(m);
            assert_eq!(html.matches("<img").count(), m.images.len(), "milestone {}", m.threshold);
            assert!(html.contains(m.message));
        }
    }

    #[test]
    fn leaderboard_has_ten_rows() {
        let html = leaderboard_html();
        assert_eq!(html.matches("<li>").count(), 10);
        assert!(html.contains("<span>1</span><span>mpy</span>"));
    }
}
