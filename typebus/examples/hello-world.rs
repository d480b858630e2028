use typebus::*;

// Define your messages
#[derive(Debug)]
struct Hello(String);

#[derive(Debug)]
struct Goodbye;

fn main() -> Result {
    let subject = Subject::new();

    // Subscribe a closure to one message type
    let greeter = subject.subscribe_fn(|hello: &Hello| {
        println!("Hello, {}!", hello.0);
        Ok(())
    });

    // Subscribe a closure to every message type
    let _audit = subject.subscribe_any_fn(|message| {
        println!("(audit) {}", message.type_name());
        Ok(())
    });

    subject.publish(&Hello("World".into()))?;
    subject.publish(&Goodbye)?;

    // After disposal the greeter no longer receives anything
    greeter.dispose();
    subject.publish(&Hello("nobody".into()))?;
    Ok(())
}
