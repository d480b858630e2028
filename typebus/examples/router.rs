use std::{cell::Cell, rc::Rc};

use typebus::*;

#[derive(Debug)]
struct Saved {
    path: String,
}

#[derive(Debug)]
struct Closed;

#[derive(Debug)]
struct KeyPress(char);

// An editor panel that reacts to several message types through one
// subscription. Typed handlers run in the order they were added; the
// catch-all handler only sees types no typed handler covers.
fn editor_panel(dirty: Rc<Cell<bool>>) -> Router {
    let on_save = dirty.clone();
    let on_key = dirty;
    Router::new()
        .with_label("editor-panel")
        .on(move |e: &Saved| {
            on_save.set(false);
            println!("saved {}", e.path);
            Ok(())
        })
        .on(|e: &Saved| {
            println!("refreshing title for {}", e.path);
            Ok(())
        })
        .on(move |k: &KeyPress| {
            on_key.set(true);
            println!("typed {:?}", k.0);
            Ok(())
        })
        .on_any(|m| {
            println!("editor ignores {}", m.type_name());
            Ok(())
        })
}

fn main() -> Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let subject = Subject::with_config(Config::default().with_name("editor"));
    let dirty = Rc::new(Cell::new(false));

    let panel = subject.subscribe(Rc::new(editor_panel(dirty.clone())));

    subject.publish(&KeyPress('x'))?;
    println!("dirty after key press: {}", dirty.get());

    subject.publish(&Saved {
        path: "notes.txt".into(),
    })?;
    println!("dirty after save: {}", dirty.get());

    subject.publish(&Closed)?;

    panel.dispose();
    Ok(())
}
