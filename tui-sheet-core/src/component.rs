//! Component trait for interactive sheet surfaces

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A UI element that renders from props and emits host actions
///
/// Components follow these rules:
/// 1. Props carry everything needed for rendering, including the sheet
/// 2. `handle_event` returns actions for the host; it never taps rows itself
/// 3. `render` draws from props plus internal UI state such as hit areas
///
/// The host owns the [`ActionSheet`](crate::sheet::ActionSheet). It turns
/// the actions it receives into calls like `tap` or `dismiss`, which keeps
/// the selection callback running on the host's side of the borrow.
///
/// # Example
///
/// ```ignore
/// use tui_sheet::prelude::*;
///
/// struct RowCount;
///
/// struct RowCountProps<'a> {
///     sheet: &'a ActionSheet,
/// }
///
/// impl Component<AppAction> for RowCount {
///     type Props<'a> = RowCountProps<'a>;
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
///         let text = format!("{} rows", props.sheet.items().len());
///         frame.render_widget(Paragraph::new(text), area);
///     }
/// }
/// ```
pub trait Component<A> {
    /// Data required to render the component (read-only)
    type Props<'a>;

    /// Handle an event and return actions to dispatch
    ///
    /// Returns any type implementing `IntoIterator<Item = A>`:
    /// - `None` - no actions (most common)
    /// - `Some(action)` - single action
    /// - `[a, b]` or `vec![...]` - multiple actions
    ///
    /// Default implementation returns no actions (render-only components).
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    /// Render the component to the frame
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
