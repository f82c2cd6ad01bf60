use dioxus::prelude::*;

use crate::domain::entities::listing::PAGE_SIZE_OPTIONS;
use crate::ui::styles::button_style;

/// The offered sizes plus `current` when a URL asked for one outside them,
/// so the select always shows the size the list is using.
fn size_choices(current: u32) -> Vec<u32> {
    let mut choices = PAGE_SIZE_OPTIONS.to_vec();
    if !choices.contains(&current) {
        choices.push(current);
        choices.sort_unstable();
    }
    choices
}

#[component]
pub fn Pagination(
    current: u32,
    page_count: u32,
    size: u32,
    total: u64,
    disabled: bool,
    on_page: EventHandler<u32>,
    on_size: EventHandler<u32>,
) -> Element {
    let last = page_count.max(1);
    let at_first = disabled || current <= 1;
    let at_last = disabled || current >= last;

    rsx! {
        div {
            style: "display: flex; gap: 8px; align-items: center; justify-content: flex-end; padding: 6px 0;",
            span { "Total {total}" }
            button {
                style: button_style(false),
                disabled: at_first,
                onclick: move |_| on_page.call(1),
                "«"
            }
            button {
                style: button_style(false),
                disabled: at_first,
                onclick: move |_| on_page.call(current.saturating_sub(1)),
                "‹"
            }
            span { "Page {current} / {last}" }
            button {
                style: button_style(false),
                disabled: at_last,
                onclick: move |_| on_page.call(current + 1),
                "›"
            }
            button {
                style: button_style(false),
                disabled: at_last,
                onclick: move |_| on_page.call(last),
                "»"
            }
            select {
                disabled: disabled,
                value: "{size}",
                onchange: move |event| {
                    if let Ok(size) = event.value().parse::<u32>() {
                        on_size.call(size);
                    }
                },
                for choice in size_choices(size) {
                    option {
                        value: "{choice}",
                        selected: choice == size,
                        "{choice} / page"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, vec![10, 20, 50, 100])]
    #[case(25, vec![10, 20, 25, 50, 100])]
    #[case(500, vec![10, 20, 50, 100, 500])]
    fn current_size_is_always_offered(#[case] size: u32, #[case] expected: Vec<u32>) {
        assert_eq!(size_choices(size), expected);
    }
}
