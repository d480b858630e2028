use std::{cell::RefCell, rc::Rc};

use typebus::*;

#[derive(Debug, Clone, Copy)]
struct Tick(u32);

#[derive(Debug)]
struct Alarm(u32);

fn main() -> Result {
    let subject = Subject::new();
    let alarm: Rc<RefCell<Option<Subscription>>> = Rc::default();

    // A one-shot sink: disposes itself the first time it runs.
    let own = alarm.clone();
    let bus = subject.downgrade();
    *alarm.borrow_mut() = Some(subject.subscribe_fn(move |tick: &Tick| {
        if tick.0 >= 3 {
            if let Some(handle) = own.borrow().as_ref() {
                handle.dispose();
            }
            // Publishing from inside a callback is delivered before this
            // publish moves on to the next sink.
            bus.publish(&Alarm(tick.0))?;
        }
        Ok(())
    }));

    let _alarm_log = subject.subscribe_fn(|a: &Alarm| {
        println!("alarm fired at tick {}", a.0);
        Ok(())
    });

    // Subscribing from inside a callback only affects later publishes.
    let bus = subject.downgrade();
    let late = Rc::new(RefCell::new(None));
    let late_slot = late.clone();
    let _recruiter = subject.subscribe_fn(move |tick: &Tick| {
        if tick.0 == 1 && late_slot.borrow().is_none() {
            let handle = bus.subscribe_fn(|t: &Tick| {
                println!("late subscriber sees tick {}", t.0);
                Ok(())
            });
            *late_slot.borrow_mut() = Some(handle);
        }
        Ok(())
    });

    for n in 0..5 {
        println!("-- tick {n} ({} subscribers)", subject.len());
        subject.publish(&Tick(n))?;
    }

    if let Some(handle) = late.borrow().as_ref() {
        handle.dispose();
    }
    Ok(())
}
