use crate::device_display::interface::{DeviceDisplay, DisplayView};
use std::error::Error;

const WIDTH: usize = 44;

pub struct DeviceDisplayConsole {
    last_view: Option<DisplayView>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self { last_view: None }
    }
}

fn row(text: &str) -> String {
    let clipped: String = text.chars().take(WIDTH).collect();
    format!("│{:<width$}│", clipped, width = WIDTH)
}

pub fn render_lines(view: &DisplayView) -> Vec<String> {
    let border = "─".repeat(WIDTH);
    let mut lines = vec![format!("┌{}┐", border)];

    lines.push(row(&format!("Image: {}", view.image_text)));
    match &view.best_match {
        Some((label, confidence)) => {
            lines.push(row(&format!("Best match: {}", label)));
            lines.push(row(&format!("Confidence: {}", confidence)));
        }
        None => lines.push(row("No predictions yet.")),
    }
    lines.push(row(&format!(
        "[{}] I acknowledge this tool does not",
        if view.consent { "x" } else { " " }
    )));
    lines.push(row("    replace professional medical advice."));
    lines.push(row(&format!(
        "Model status: {}   {}",
        view.status_text, view.side_text
    )));
    lines.push(row(&format!(
        "<{}>{}",
        view.button_text,
        if view.classify_enabled { "" } else { " (disabled)" }
    )));

    if let Some(alert) = &view.alert {
        lines.push(format!("├{}┤", border));
        lines.push(row(&format!("! {}", alert)));
        lines.push(row("  (type ok to dismiss)"));
    }

    lines.push(format!("└{}┘", border));
    lines
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("Histology classifier");
        Ok(())
    }

    fn render(&mut self, view: &DisplayView) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.last_view.as_ref() == Some(view) {
            return Ok(());
        }

        for line in render_lines(view) {
            println!("{}", line);
        }
        self.last_view = Some(view.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lines_with_prediction_and_alert() {
        let view = DisplayView {
            image_text: "tile.png".to_string(),
            status_text: "Ready".to_string(),
            side_text: "5 classes".to_string(),
            consent: true,
            classify_enabled: true,
            button_text: "Classify".to_string(),
            best_match: Some(("Serous".to_string(), "65.00%".to_string())),
            alert: Some("Prediction failed".to_string()),
        };

        let lines = render_lines(&view);

        assert!(lines.iter().any(|l| l.contains("Best match: Serous")));
        assert!(lines.iter().any(|l| l.contains("Confidence: 65.00%")));
        assert!(lines.iter().any(|l| l.contains("[x] I acknowledge")));
        assert!(lines.iter().any(|l| l.contains("! Prediction failed")));
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn test_render_lines_without_prediction() {
        let view = DisplayView {
            button_text: "Classify".to_string(),
            ..DisplayView::default()
        };

        let lines = render_lines(&view);

        assert!(lines.iter().any(|l| l.contains("No predictions yet.")));
        assert!(lines.iter().any(|l| l.contains("<Classify> (disabled)")));
    }
}
