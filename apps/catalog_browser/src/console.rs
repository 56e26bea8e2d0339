//! Page surface that prints every mount, selection change and alert to the terminal.

use catalog_client::{markup::SELECTED_CLASS, Container, MarkupVariant, PageSurface};
use shared::{domain::MisuseCaseId, protocol::Fragment};

pub struct ConsoleSurface {
    markup: MarkupVariant,
}

impl ConsoleSurface {
    pub fn new(markup: MarkupVariant) -> Self {
        Self { markup }
    }
}

impl PageSurface for ConsoleSurface {
    fn mount(&self, container: Container, fragment: &Fragment) {
        println!("== {} ==", self.markup.container_selector(container));
        if fragment.is_empty() {
            println!("(empty)");
        } else {
            println!("{}", fragment.as_str().trim());
        }
    }

    fn mark_selected(&self, previous: Option<&MisuseCaseId>, current: Option<&MisuseCaseId>) {
        match (previous, current) {
            (Some(previous), Some(current)) => {
                println!("* .{SELECTED_CLASS} {current} (was {previous})")
            }
            (None, Some(current)) => println!("* .{SELECTED_CLASS} {current}"),
            (Some(previous), None) => println!("* .{SELECTED_CLASS} cleared from {previous}"),
            (None, None) => {}
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("[alert] {message}");
    }
}
