use std::rc::Rc;

use typebus::{monitoring::Monitor, monitors::DeliveryStats, *};

#[derive(Debug)]
struct Order(u32);

// Custom monitor demonstrating the Monitor trait.
// For simple tracing, consider using `typebus::monitors::Tracer` instead.
struct Printer;

impl Monitor for Printer {
    fn on_delivered(&self, message: Message<'_>, id: SubscriptionId, route: Route) {
        println!("{} delivered to {id} via {route}", message.type_name());
    }

    fn on_error(&self, message: Message<'_>, id: SubscriptionId, error: &Error) {
        eprintln!("{} failed in {id}: {error}", message.type_name());
    }

    fn on_unsubscribed(&self, id: SubscriptionId, sink: &str) {
        println!("{sink} ({id}) unsubscribed");
    }
}

fn main() -> Result {
    let subject = Subject::new();
    let stats = DeliveryStats::new();
    subject.monitors().add(Printer);
    subject.monitors().add(stats.clone());

    let orders = subject.subscribe(Rc::new(
        Router::new()
            .with_label("orders")
            .on(|o: &Order| {
                if o.0 == 0 {
                    // Intentionally fail to demonstrate on_error monitoring
                    return Err(Error::sink("empty order"));
                }
                Ok(())
            })
            .on_any(|_| Ok(())),
    ));

    subject.publish(&Order(3))?;
    subject.publish(&"ping")?;
    if let Err(e) = subject.publish(&Order(0)) {
        println!("publish failed: {e}");
    }

    orders.dispose();

    println!(
        "orders: published {}, delivered {}, failed {}",
        stats.published::<Order>(),
        stats.delivered::<Order>(),
        stats.failed::<Order>()
    );
    Ok(())
}
