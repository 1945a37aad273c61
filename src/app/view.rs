//! Layout and rendering of the three panels.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Widget, Wrap,
        canvas::{Canvas, Line as Segment, Points},
    },
};

use crate::api::{PlaylistItem, TrackPoint};
use crate::map_view::MapView;
use crate::query::QueryResult;

use super::App;

/// Width of one playlist card, in columns.
pub const CARD_WIDTH: u16 = 24;

/// Card width plus the gap to the next card.
pub const CARD_PITCH: u16 = CARD_WIDTH + 2;

const STRIP_TITLE: &str = " Recordings  <-/-> scroll  drag  click to play  q quit ";

/// Screen areas of the panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub player: Rect,
    pub map: Rect,
    pub strip: Rect,
}

impl Panes {
    /// Player and map share the top three quarters 2:1; the playlist strip
    /// takes the bottom quarter.
    #[must_use]
    pub fn new(area: Rect) -> Self {
        let [top, strip] =
            Layout::vertical([Constraint::Percentage(75), Constraint::Percentage(25)]).areas(area);
        let [player, map] =
            Layout::horizontal([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)]).areas(top);
        Self { player, map, strip }
    }

    /// The scrollable area inside the strip's border.
    #[must_use]
    pub fn strip_inner(&self) -> Rect {
        Block::bordered().inner(self.strip)
    }
}

/// Total width of the cards for `count` items.
#[must_use]
pub fn content_width(count: usize) -> f64 {
    match count {
        0 => 0.0,
        n => (n as f64) * f64::from(CARD_PITCH) - f64::from(CARD_PITCH - CARD_WIDTH),
    }
}

/// The card under content column `x`, if any. Gaps belong to no card.
#[must_use]
pub fn card_at(x: f64, count: usize) -> Option<usize> {
    if x < 0.0 {
        return None;
    }
    let index = (x / f64::from(CARD_PITCH)).floor() as usize;
    let within = x - (index as f64) * f64::from(CARD_PITCH);
    (index < count && within < f64::from(CARD_WIDTH)).then_some(index)
}

pub(super) fn render(app: &App, frame: &mut Frame<'_>) {
    let panes = Panes::new(frame.area());
    render_player(app.selected(), frame, panes.player);
    render_map(app.track(), app.map_view(), frame, panes.map);
    render_strip(app, frame, panes.strip);
}

fn centered_line(area: Rect) -> Rect {
    let [_, line, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    line
}

fn render_player(selected: Option<&PlaylistItem>, frame: &mut Frame<'_>, area: Rect) {
    let block = Block::bordered().title(" Player ");
    let inner = block.inner(area);

    let Some(item) = selected else {
        frame.render_widget(block.bg(Color::Black), area);
        frame.render_widget(
            Paragraph::new("NO VIDEO SOURCE")
                .bold()
                .white()
                .alignment(Alignment::Center),
            centered_line(inner),
        );
        return;
    };

    let lines = vec![
        Line::from(item.title.as_str()).bold(),
        Line::default(),
        Line::from(vec![Span::from("video ").dim(), Span::from(item.video.as_str())]),
        Line::from(vec![Span::from("image ").dim(), Span::from(item.image.as_str())]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn placeholder(title: &str, text: &str, style: Style) -> Paragraph<'static> {
    Paragraph::new(text.to_owned())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::bordered().title(title.to_owned()))
}

fn render_map(
    track: &QueryResult<Vec<TrackPoint>>,
    view: &MapView,
    frame: &mut Frame<'_>,
    area: Rect,
) {
    if track.is_loading() || track.is_fetching() {
        frame.render_widget(placeholder(" Map ", "", Style::new().dark_gray()), area);
        frame.render_widget(
            Paragraph::new("Loading track...")
                .dark_gray()
                .alignment(Alignment::Center),
            centered_line(Block::bordered().inner(area)),
        );
        return;
    }

    let MapView::Track {
        polyline,
        center,
        start,
        end,
        bounds,
    } = view
    else {
        let text = match (track.is_uninitialized(), track.error()) {
            (true, _) => "Select a recording",
            (false, Some(_)) => "Track unavailable",
            (false, None) => "No track recorded",
        };
        frame.render_widget(placeholder(" Map ", "", Style::new().gray()), area);
        frame.render_widget(
            Paragraph::new(text).gray().alignment(Alignment::Center),
            centered_line(Block::bordered().inner(area)),
        );
        return;
    };

    if track.is_error() {
        let unavailable = placeholder(" Map ", "Track unavailable", Style::new().gray());
        frame.render_widget(unavailable, area);
        return;
    }

    let frame_bounds = bounds.padded(0.1, 0.0005);
    let coords: Vec<(f64, f64)> = polyline.iter().map(|&(lat, lon)| (lon, lat)).collect();
    let title = format!(" Map  {:.0} km/h at {} ", center.speed, center.timestamp);

    let canvas = Canvas::default()
        .block(Block::bordered().title(title))
        .x_bounds([frame_bounds.west, frame_bounds.east])
        .y_bounds([frame_bounds.south, frame_bounds.north])
        .paint(|ctx| {
            for pair in coords.windows(2) {
                ctx.draw(&Segment {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color: Color::Red,
                });
            }
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Blue,
            });
            ctx.layer();
            ctx.print(start.1, start.0, "S".green().bold());
            ctx.print(end.1, end.0, "E".red().bold());
        });
    frame.render_widget(canvas, area);
}

fn render_strip(app: &App, frame: &mut Frame<'_>, area: Rect) {
    let playlist = app.playlist();
    let block = Block::bordered().title(STRIP_TITLE);

    if playlist.is_loading() || playlist.is_fetching() {
        let loading = placeholder(" Recordings ", "Loading...", Style::new().dark_gray());
        frame.render_widget(loading, area);
        return;
    }
    if let Some(error) = playlist.error() {
        let text = format!("Playlist unavailable: {error}");
        frame.render_widget(placeholder(" Recordings ", &text, Style::new().red()), area);
        return;
    }
    let items = playlist.data().map_or(&[][..], Vec::as_slice);
    if items.is_empty() {
        let empty = placeholder(" Recordings ", "No recordings", Style::new().gray());
        frame.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = content_width(items.len()).min(f64::from(u16::MAX)) as u16;
    let mut cards = Buffer::empty(Rect::new(0, 0, width, inner.height));
    let selected_index = app.selected_index();
    for (index, item) in items.iter().enumerate() {
        let Ok(column) = u16::try_from(index * usize::from(CARD_PITCH)) else {
            break;
        };
        let rect = Rect::new(column, 0, CARD_WIDTH, inner.height).intersection(cards.area);
        card(item, selected_index == Some(index)).render(rect, &mut cards);
    }

    blit(&cards, app.viewport().offset().round() as u16, frame.buffer_mut(), inner);
}

fn card(item: &PlaylistItem, selected: bool) -> Paragraph<'_> {
    let border = if selected {
        Style::new().yellow().bold()
    } else {
        Style::new()
    };
    Paragraph::new(vec![
        Line::from(item.title.as_str()).bold(),
        Line::from(item.map_source.as_str()).dim(),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::bordered().border_style(border))
}

/// Copies the window of `source` starting at column `offset` into `area`.
fn blit(source: &Buffer, offset: u16, target: &mut Buffer, area: Rect) {
    for y in 0..area.height {
        for x in 0..area.width {
            let Some(column) = offset.checked_add(x) else {
                break;
            };
            if let (Some(cell), Some(dst)) = (
                source.cell((column, y)),
                target.cell_mut((area.x + x, area.y + y)),
            ) {
                *dst = cell.clone();
            }
        }
    }
}
