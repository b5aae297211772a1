//! Action sheet component: draws a sheet and turns input into host actions

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use tracing::{trace, warn};
use tui_sheet_core::{
    ActionSheet, Component, EventKind, Keymap, Row, RowKind, RowPosition, SheetCommand,
    SheetLayout, Size,
};

use crate::metrics::{text_width, wrap_title, CHECKMARK_WIDTH, ROW_PADDING};
use crate::modal::{cells, render_modal, sheet_rect, ModalStyle};

/// Props for ActionSheetView component
pub struct ActionSheetViewProps<'a, A> {
    /// The sheet to draw; the host keeps ownership
    pub sheet: &'a ActionSheet,
    /// Row drawn with the highlight style
    pub highlighted: Option<RowPosition>,
    pub keymap: &'a Keymap,
    /// Whether this component receives input
    pub is_focused: bool,
    /// Action for moving the highlight
    pub on_highlight: fn(RowPosition) -> A,
    /// Action for tapping a row
    pub on_tap: fn(RowPosition) -> A,
    /// Action for closing a sheet that has no cancel button
    pub on_cancel: fn() -> A,
}

/// Colors and text styles of a sheet
#[derive(Debug, Clone)]
pub struct SheetViewStyle {
    pub item: Style,
    pub highlight: Style,
    pub title: Style,
    pub section_title: Style,
    pub button: Style,
    pub ok_button: Style,
    pub cancel_button: Style,
    pub checkmark: &'static str,
}

impl Default for SheetViewStyle {
    fn default() -> Self {
        Self {
            item: Style::default(),
            highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            title: Style::default().add_modifier(Modifier::BOLD),
            section_title: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            button: Style::default().fg(Color::Cyan),
            ok_button: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            cancel_button: Style::default().fg(Color::Red),
            checkmark: "✓",
        }
    }
}

/// Interactive view of an [`ActionSheet`]
///
/// Rows are stacked in the order the sheet's layout gives them: header,
/// items, buttons, each non-empty group followed by `content_inset` blank
/// cells. Heights are measured at the width of the drawn area from the
/// sheet's current state. Rows that do not fit in the area are clipped.
///
/// Keys go through the props' [`Keymap`]. Navigation only lands on
/// tappable rows. Taps inside a row tap it; taps outside the sheet count
/// as a cancel. Cancel taps the sheet's cancel button when it has one,
/// so its selection action sees the cancel like any other row.
#[derive(Debug, Default)]
pub struct ActionSheetView {
    style: SheetViewStyle,
    /// Area of the last render
    area: Rect,
    /// Drawn tappable rows, top to bottom
    hit_areas: Vec<(Rect, RowPosition)>,
}

impl ActionSheetView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: SheetViewStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Area the sheet was last drawn in
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Tappable row drawn at a terminal cell
    pub fn row_at(&self, column: u16, row: u16) -> Option<RowPosition> {
        let position = Position::new(column, row);
        self.hit_areas
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, pos)| *pos)
    }

    /// Dim the background and draw the sheet where its presenter puts it
    ///
    /// Returns the area the sheet was drawn in.
    pub fn present<A>(
        &mut self,
        frame: &mut Frame,
        props: ActionSheetViewProps<'_, A>,
        modal: &ModalStyle,
    ) -> Rect {
        let sheet = props.sheet;
        let size = match sheet.preferred_size() {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, "Cannot size sheet");
                return Rect::default();
            }
        };
        let presenter = sheet.presenter();
        let (style, anchor) = (presenter.style(), presenter.anchor());

        // placement fixes the width; the height follows from wrapping at it
        let width = sheet_rect(style, size, anchor, frame.area()).width;
        let height = match sheet.layout_for_width(f32::from(width)) {
            Ok(layout) => layout.content_height,
            Err(e) => {
                warn!(error = %e, "Cannot size sheet");
                return Rect::default();
            }
        };
        let rect = sheet_rect(style, Size::new(size.width, height), anchor, frame.area());
        render_modal(frame, rect, modal);
        self.render(frame, rect, props);
        rect
    }

    fn cancel<A>(&self, props: &ActionSheetViewProps<'_, A>) -> A {
        match props.sheet.cancel_position() {
            Some(position) => (props.on_tap)(position),
            None => (props.on_cancel)(),
        }
    }

    fn navigate<A>(
        &self,
        command: SheetCommand,
        props: &ActionSheetViewProps<'_, A>,
    ) -> Option<A> {
        let tappable: Vec<RowPosition> = props
            .sheet
            .rows()
            .filter(|(_, row)| row.kind().is_tappable())
            .map(|(position, _)| position)
            .collect();
        let current = props
            .highlighted
            .and_then(|h| tappable.iter().position(|p| *p == h));

        let target = match (command, current) {
            (SheetCommand::First, _) | (SheetCommand::Next, None) => tappable.first(),
            (SheetCommand::Last, _) | (SheetCommand::Previous, None) => tappable.last(),
            (SheetCommand::Next, Some(i)) => tappable.get(i + 1),
            (SheetCommand::Previous, Some(i)) => i.checked_sub(1).and_then(|i| tappable.get(i)),
            _ => None,
        }?;

        if Some(*target) == props.highlighted {
            None
        } else {
            Some((props.on_highlight)(*target))
        }
    }

    fn action_for<A>(&self, event: &EventKind, props: &ActionSheetViewProps<'_, A>) -> Option<A> {
        match event {
            EventKind::Key(key) => match props.keymap.command_for(*key)? {
                SheetCommand::Select => {
                    let position = props.highlighted?;
                    let row = props.sheet.row(position)?;
                    row.kind().is_tappable().then(|| (props.on_tap)(position))
                }
                SheetCommand::Cancel => Some(self.cancel(props)),
                command => self.navigate(command, props),
            },
            EventKind::Tap { column, row } => {
                if let Some(position) = self.row_at(*column, *row) {
                    trace!(?position, "Tap landed on row");
                    return Some((props.on_tap)(position));
                }
                if self.area.contains(Position::new(*column, *row)) {
                    None
                } else {
                    Some(self.cancel(props))
                }
            }
            EventKind::Scroll { delta, .. } => {
                let command = if *delta > 0 {
                    SheetCommand::Next
                } else {
                    SheetCommand::Previous
                };
                self.navigate(command, props)
            }
            _ => None,
        }
    }

    fn row_style(&self, row: &Row, highlighted: bool) -> Style {
        let base = match row.kind() {
            RowKind::Item | RowKind::Toggle { .. } | RowKind::SectionMargin => self.style.item,
            RowKind::Title => self.style.title,
            RowKind::SectionTitle => self.style.section_title,
            RowKind::OkButton => self.style.ok_button,
            RowKind::CancelButton => self.style.cancel_button,
            RowKind::Button => self.style.button,
        };
        if highlighted {
            base.patch(self.style.highlight)
        } else {
            base
        }
    }

    fn row_lines(&self, row: &Row, width: u16) -> Vec<Line<'static>> {
        match row.kind() {
            RowKind::SectionMargin => Vec::new(),
            RowKind::Item | RowKind::Toggle { .. } => {
                let text_width = text_width(row.kind(), f32::from(width));
                let wrapped = wrap_title(row.title_text(), text_width);
                let is_toggle = matches!(row.kind(), RowKind::Toggle { .. });
                wrapped
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| {
                        let mut spans = Vec::with_capacity(2);
                        if is_toggle {
                            let mark = if i == 0 && row.is_toggled() == Some(true) {
                                self.style.checkmark
                            } else {
                                ""
                            };
                            spans.push(Span::raw(format!(
                                "{:<width$}",
                                mark,
                                width = CHECKMARK_WIDTH as usize
                            )));
                        }
                        spans.push(Span::raw(text.into_owned()));
                        Line::from(spans)
                    })
                    .collect()
            }
            _ => vec![Line::raw(row.title_text().to_string())],
        }
    }

    /// Draw one group, starting `offset` cells below the top of `inner`
    fn render_group(
        &mut self,
        frame: &mut Frame,
        inner: Rect,
        offset: f32,
        rows: &[(RowPosition, &Row)],
        heights: &[f32],
        highlighted: Option<RowPosition>,
    ) {
        let mut top = offset;
        for ((position, row), height) in rows.iter().zip(heights) {
            let bottom = top + height;
            let Some(rect) = band(inner, top, bottom) else {
                top = bottom;
                continue;
            };
            top = bottom;

            let is_highlighted = highlighted == Some(*position);
            let style = self.row_style(row, is_highlighted);
            frame.buffer_mut().set_style(rect, style);

            let text_area = Rect {
                x: rect.x + ROW_PADDING.min(rect.width),
                width: rect.width.saturating_sub(2 * ROW_PADDING),
                ..rect
            };
            let alignment = if row.kind().is_button() {
                Alignment::Center
            } else {
                Alignment::Left
            };
            let lines = self.row_lines(row, rect.width);
            frame.render_widget(
                Paragraph::new(lines).style(style).alignment(alignment),
                text_area,
            );

            if row.kind().is_tappable() {
                self.hit_areas.push((rect, *position));
            }
        }
    }
}

/// Rows of `inner` covering `top..bottom` cells from its top, clipped
fn band(inner: Rect, top: f32, bottom: f32) -> Option<Rect> {
    let start = inner.y.saturating_add(cells(top)).min(inner.bottom());
    let end = inner.y.saturating_add(cells(bottom)).min(inner.bottom());
    (end > start).then(|| Rect::new(inner.x, start, inner.width, end - start))
}

impl<A> Component<A> for ActionSheetView {
    type Props<'a> = ActionSheetViewProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused || props.sheet.is_dismissed() {
            return None;
        }
        self.action_for(event, &props)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.area = area;
        self.hit_areas.clear();

        let sheet = props.sheet;
        let layout: SheetLayout = match sheet.layout_for_width(f32::from(area.width)) {
            Ok(layout) => layout,
            Err(e) => {
                warn!(error = %e, "Cannot lay out sheet");
                return;
            }
        };

        frame.render_widget(Clear, area);
        clear_style(frame.buffer_mut(), area, self.style.item);

        let inset = layout.content_inset;
        let mut offset = 0.0;

        if layout.header_height > 0.0 {
            if let (Some(header), Some(rect)) =
                (sheet.header(), band(area, offset, layout.header_height))
            {
                header.render(frame, rect);
            }
            offset += layout.header_total_height;
        }

        let items: Vec<(RowPosition, &Row)> = sheet
            .items()
            .iter()
            .enumerate()
            .map(|(i, row)| (RowPosition::item(i), row))
            .collect();
        self.render_group(frame, area, offset, &items, &layout.item_heights, props.highlighted);
        if layout.items_height > 0.0 {
            offset += layout.items_height + inset;
        }

        let buttons: Vec<(RowPosition, &Row)> = sheet
            .buttons()
            .iter()
            .enumerate()
            .map(|(i, row)| (RowPosition::button(i), row))
            .collect();
        self.render_group(frame, area, offset, &buttons, &layout.button_heights, props.highlighted);
    }
}

fn clear_style(buf: &mut Buffer, area: Rect, style: Style) {
    buf.set_style(area.intersection(buf.area), style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_sheet_core::testing::{key, tap_at, RenderHarness};
    use tui_sheet_core::{Appearance, SharedAppearance, TextHeader};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Highlight(RowPosition),
        Tap(RowPosition),
        Close,
    }

    fn sheet(rows: Vec<Row>) -> ActionSheet {
        let mut appearance = Appearance::new();
        appearance.set_content_inset(0.0).unwrap();
        let mut sheet = ActionSheet::builder(rows)
            .appearance(SharedAppearance::new(appearance))
            .row_heights(crate::TerminalHeights)
            .build()
            .unwrap();
        sheet.set_content_width(30.0).unwrap();
        sheet.host_will_layout().unwrap();
        sheet
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::title("Share"),
            Row::item("Copy"),
            Row::toggle("Comments", true),
            Row::cancel_button("Cancel"),
        ]
    }

    fn props<'a>(
        sheet: &'a ActionSheet,
        keymap: &'a Keymap,
        highlighted: Option<RowPosition>,
    ) -> ActionSheetViewProps<'a, TestAction> {
        ActionSheetViewProps {
            sheet,
            highlighted,
            keymap,
            is_focused: true,
            on_highlight: TestAction::Highlight,
            on_tap: TestAction::Tap,
            on_cancel: || TestAction::Close,
        }
    }

    fn handle(
        view: &mut ActionSheetView,
        event: EventKind,
        props: ActionSheetViewProps<'_, TestAction>,
    ) -> Vec<TestAction> {
        view.handle_event(&event, props).into_iter().collect()
    }

    #[test]
    fn test_navigation_skips_titles() {
        let sheet = sheet(rows());
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();

        let actions = handle(&mut view, EventKind::Key(key("j")), props(&sheet, &keymap, None));
        assert_eq!(actions, vec![TestAction::Highlight(RowPosition::item(1))]);

        let actions = handle(
            &mut view,
            EventKind::Key(key("k")),
            props(&sheet, &keymap, Some(RowPosition::item(1))),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_navigation_crosses_into_buttons() {
        let sheet = sheet(rows());
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();

        let actions = handle(
            &mut view,
            EventKind::Key(key("down")),
            props(&sheet, &keymap, Some(RowPosition::item(2))),
        );
        assert_eq!(actions, vec![TestAction::Highlight(RowPosition::button(0))]);

        let actions = handle(
            &mut view,
            EventKind::Key(key("end")),
            props(&sheet, &keymap, Some(RowPosition::button(0))),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_select_taps_highlighted_row() {
        let sheet = sheet(rows());
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();

        let actions = handle(
            &mut view,
            EventKind::Key(key("enter")),
            props(&sheet, &keymap, Some(RowPosition::item(2))),
        );
        assert_eq!(actions, vec![TestAction::Tap(RowPosition::item(2))]);

        let actions = handle(&mut view, EventKind::Key(key("enter")), props(&sheet, &keymap, None));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_cancel_prefers_cancel_button() {
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();

        let with_button = sheet(rows());
        let actions = handle(&mut view, EventKind::Key(key("esc")), props(&with_button, &keymap, None));
        assert_eq!(actions, vec![TestAction::Tap(RowPosition::button(0))]);

        let without_button = sheet(vec![Row::item("Copy")]);
        let actions = handle(
            &mut view,
            EventKind::Key(key("esc")),
            props(&without_button, &keymap, None),
        );
        assert_eq!(actions, vec![TestAction::Close]);
    }

    #[test]
    fn test_unfocused_or_dismissed_sheet_ignores_input() {
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();
        let mut sheet = sheet(rows());

        let mut unfocused = props(&sheet, &keymap, None);
        unfocused.is_focused = false;
        assert!(handle(&mut view, EventKind::Key(key("j")), unfocused).is_empty());

        sheet.dismiss();
        assert!(handle(&mut view, EventKind::Key(key("j")), props(&sheet, &keymap, None)).is_empty());
    }

    #[test]
    fn test_render_draws_rows_in_order() {
        let sheet = sheet(rows());
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();
        let mut render = RenderHarness::new(30, 4);

        let output = render.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), props(&sheet, &keymap, None));
        });

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0].trim(), "Share");
        assert_eq!(lines[1].trim(), "Copy");
        assert_eq!(lines[2].trim(), "✓ Comments");
        assert_eq!(lines[3].trim(), "Cancel");
    }

    #[test]
    fn test_render_leaves_inset_after_each_group() {
        let mut sheet = ActionSheet::builder(vec![Row::item("Copy"), Row::ok_button("OK")])
            .appearance(SharedAppearance::default())
            .header(TextHeader::new(["Pick"]))
            .build()
            .unwrap();
        sheet.set_content_width(20.0).unwrap();
        sheet.host_will_layout().unwrap();
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();
        let mut render = RenderHarness::new(20, 6);

        let output = render.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), props(&sheet, &keymap, None));
        });

        let lines: Vec<&str> = output.lines().map(str::trim).collect();
        assert_eq!(lines, vec!["Pick", "", "Copy", "", "OK", ""]);
    }

    #[test]
    fn test_taps_hit_rendered_rows() {
        let sheet = sheet(rows());
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();
        let mut render = RenderHarness::new(40, 10);

        render.render(|frame| {
            view.render(frame, Rect::new(5, 6, 30, 4), props(&sheet, &keymap, None));
        });

        // title row is not tappable
        assert!(handle(&mut view, tap_at(10, 6), props(&sheet, &keymap, None)).is_empty());
        assert_eq!(
            handle(&mut view, tap_at(10, 7), props(&sheet, &keymap, None)),
            vec![TestAction::Tap(RowPosition::item(1))]
        );
        assert_eq!(
            handle(&mut view, tap_at(34, 9), props(&sheet, &keymap, None)),
            vec![TestAction::Tap(RowPosition::button(0))]
        );
        // outside the sheet taps the cancel button
        assert_eq!(
            handle(&mut view, tap_at(0, 0), props(&sheet, &keymap, None)),
            vec![TestAction::Tap(RowPosition::button(0))]
        );
    }

    #[test]
    fn test_wrapped_rows_take_extra_lines() {
        let mut sheet = sheet(vec![Row::item("alpha beta gamma"), Row::item("next")]);
        sheet.set_content_width(10.0).unwrap();
        sheet.host_will_layout().unwrap();
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();
        let mut render = RenderHarness::new(10, 4);

        let output = render.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), props(&sheet, &keymap, None));
        });

        let lines: Vec<&str> = output.lines().map(str::trim).collect();
        assert_eq!(lines, vec!["alpha", "beta", "gamma", "next"]);
        assert_eq!(view.row_at(3, 2), Some(RowPosition::item(0)));
        assert_eq!(view.row_at(3, 3), Some(RowPosition::item(1)));
    }

    #[test]
    fn test_render_follows_shared_appearance_changes() {
        let appearance = SharedAppearance::default();
        let mut sheet = ActionSheet::builder(vec![Row::item("Copy"), Row::item("Paste")])
            .appearance(appearance.clone())
            .build()
            .unwrap();
        sheet.set_content_width(20.0).unwrap();
        sheet.host_will_layout().unwrap();
        appearance.update(|a| a.set_item_height(2.0)).unwrap();

        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();
        let mut render = RenderHarness::new(20, 6);
        let output = render.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), props(&sheet, &keymap, None));
        });

        let lines: Vec<&str> = output.lines().map(str::trim).collect();
        assert_eq!(&lines[..3], &["Copy", "", "Paste"]);
        assert_eq!(view.row_at(1, 1), Some(RowPosition::item(0)));
        assert_eq!(view.row_at(1, 3), Some(RowPosition::item(1)));
    }

    #[test]
    fn test_present_places_modal_sheet_at_bottom() {
        let sheet = sheet(rows());
        let keymap = Keymap::default();
        let mut view = ActionSheetView::new();
        let mut render = RenderHarness::new(30, 10);

        let mut rect = Rect::default();
        let output = render.render_to_string_plain(|frame| {
            rect = view.present(frame, props(&sheet, &keymap, None), &ModalStyle::default());
        });

        assert_eq!(rect, Rect::new(0, 6, 30, 4));
        assert_eq!(output.lines().nth(6).map(str::trim), Some("Share"));
    }
}
