use paperdock_core::{AppViewModel, OutputView, PanelView, SlotPanelView, Thumbnail, ToastKind};
use serde_json::{json, Value};

pub fn render_text(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let tabs: Vec<String> = view
        .tabs
        .iter()
        .map(|tab| match (tab.active, tab.enabled) {
            (true, _) => format!("[{}]", tab.title),
            (false, true) => tab.title.to_string(),
            (false, false) => format!("({} - disabled)", tab.title),
        })
        .collect();
    lines.push(tabs.join(" | "));

    for panel in &view.panels {
        lines.push(String::new());
        match panel {
            PanelView::Unavailable { title, notice, .. } => {
                lines.push(format!("== {title} =="));
                lines.push(format!("  {notice}"));
            }
            PanelView::Available(panel) => render_panel(panel, &mut lines),
        }
    }

    if !view.toasts.is_empty() {
        lines.push(String::new());
    }
    for toast in &view.toasts {
        let marker = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
        };
        lines.push(format!("[{marker}] {}", toast.message));
    }
    lines
}

fn render_panel(panel: &SlotPanelView, lines: &mut Vec<String>) {
    lines.push(format!("== {} ==", panel.title));
    if panel.drag_active {
        lines.push(format!("  >> {} <<", panel.drop_hint));
    } else {
        lines.push(format!("  {}", panel.drop_hint));
    }

    if panel.list_visible {
        lines.push(format!("  Files ({}):", panel.files.len()));
        for file in &panel.files {
            let icon = match &file.thumbnail {
                Thumbnail::Image { mime, byte_len } => format!("{mime}, {byte_len} bytes"),
                Thumbnail::PdfIcon => "pdf".to_string(),
                Thumbnail::GenericIcon => "file".to_string(),
            };
            lines.push(format!("    - {} ({icon})", file.name));
        }
    }

    let state = if panel.trigger.enabled { "" } else { " (disabled)" };
    lines.push(format!("  <{}>{state}", panel.trigger.label));

    match &panel.output {
        OutputView::Empty => {}
        OutputView::Loading => lines.push("  ...".to_string()),
        OutputView::Downloads {
            status,
            links,
            preview,
        } => {
            lines.push(format!("  {status}"));
            for link in links {
                lines.push(format!(
                    "    {} -> {} ({} bytes)",
                    link.label, link.filename, link.byte_len
                ));
            }
            if let Some(preview) = preview {
                lines.push(format!("    preview: {preview}"));
            }
        }
        OutputView::Error(message) => lines.push(format!("  ! {message}")),
    }
}

pub fn render_json(view: &AppViewModel) -> Value {
    let panels: Vec<Value> = view.panels.iter().map(panel_json).collect();
    let toasts: Vec<Value> = view
        .toasts
        .iter()
        .map(|toast| {
            json!({
                "kind": match toast.kind {
                    ToastKind::Success => "success",
                    ToastKind::Error => "error",
                },
                "message": toast.message,
            })
        })
        .collect();
    json!({
        "active_tab": view.active_tab.spec().title,
        "panels": panels,
        "toasts": toasts,
    })
}

fn panel_json(panel: &PanelView) -> Value {
    let panel = match panel {
        PanelView::Unavailable { title, notice, .. } => {
            return json!({ "title": title, "available": false, "notice": notice });
        }
        PanelView::Available(panel) => panel,
    };

    let output = match &panel.output {
        OutputView::Empty => Value::Null,
        OutputView::Loading => json!({ "state": "loading" }),
        OutputView::Downloads {
            status,
            links,
            preview,
        } => json!({
            "state": "result",
            "status": status,
            "downloads": links
                .iter()
                .map(|link| json!({
                    "label": link.label,
                    "filename": link.filename,
                    "bytes": link.byte_len,
                }))
                .collect::<Vec<_>>(),
            "preview": preview,
        }),
        OutputView::Error(message) => json!({ "state": "error", "message": message }),
    };

    json!({
        "title": panel.title,
        "available": true,
        "files": panel.files.iter().map(|file| file.name.as_str()).collect::<Vec<_>>(),
        "trigger": { "label": panel.trigger.label, "enabled": panel.trigger.enabled },
        "output": output,
    })
}
