use std::{
    io::{self, Write},
    path::Path,
};

use crate::post::FALLBACK_AVATAR;

use super::{
    DetailView, Effect, ListBody, ListView, NotificationKind, PageControl, View,
    NOTIFICATION_TIMEOUT,
};

// A local avatar missing on disk counts as failing to load.
fn avatar(path: &str) -> &str {
    let remote = path.starts_with("http://") || path.starts_with("https://");
    if remote || Path::new(path).exists() {
        path
    } else {
        FALLBACK_AVATAR
    }
}

/// Renders effects as plain text.
#[derive(Debug)]
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn list(&mut self, view: &ListView) -> io::Result<()> {
        match &view.body {
            ListBody::Cards(cards) => {
                for (index, card) in cards.iter().enumerate() {
                    writeln!(self.out, "[{}] {}", index + 1, card.title)?;
                    writeln!(
                        self.out,
                        "    {} - {}  ({})",
                        card.author,
                        card.date,
                        avatar(&card.avatar)
                    )?;
                    writeln!(self.out, "    {}", card.preview)?;
                }
            }
            ListBody::Empty => writeln!(self.out, "No blogs found.")?,
            ListBody::Error(message) => writeln!(self.out, "Error loading posts: {}", message)?,
        }

        if !view.controls.is_empty() {
            let controls: Vec<String> = view
                .controls
                .iter()
                .map(|control| match control {
                    PageControl::Page { active: true, .. } => format!("[{}]", control.label()),
                    PageControl::Prev(_) => format!("< {}", control.label()),
                    PageControl::Next(_) => format!("{} >", control.label()),
                    PageControl::Page { .. } => control.label(),
                })
                .collect();
            writeln!(self.out, "{}", controls.join("  "))?;
        }
        Ok(())
    }

    fn detail(&mut self, view: &DetailView) -> io::Result<()> {
        writeln!(self.out, "{}", view.title)?;
        writeln!(
            self.out,
            "By {} on {}  ({})",
            view.author,
            view.date,
            avatar(&view.avatar)
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", view.content)?;
        writeln!(self.out)?;
        writeln!(self.out, "edit: {}  |  delete", view.edit)
    }
}

impl<W: Write> View for TerminalView<W> {
    fn apply(&mut self, effect: &Effect) -> io::Result<()> {
        match effect {
            Effect::List(view) => self.list(view)?,
            Effect::Detail(view) => self.detail(view)?,
            Effect::Notify(notification) => {
                let tag = match notification.kind {
                    NotificationKind::Success => "success",
                    NotificationKind::Error => "error",
                };
                writeln!(
                    self.out,
                    "[{}] {} (closes in {}s)",
                    tag,
                    notification.message,
                    NOTIFICATION_TIMEOUT.as_secs()
                )?;
            }
            Effect::InlineError(message) => writeln!(self.out, "error: {}", message)?,
            Effect::Alert(message) => writeln!(self.out, "! {}", message)?,
            Effect::FillForm(form) => {
                writeln!(self.out, "title:   {}", form.title)?;
                writeln!(self.out, "content: {}", form.content)?;
            }
            Effect::Navigate { to, .. } => writeln!(self.out, "-> {}", to)?,
        }
        self.out.flush()
    }

    fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }
}
