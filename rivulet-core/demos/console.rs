//! Console rendering demo.
//!
//! Two components render to stdout through effects. Each owns a profiles
//! store and a local counter; both read one global counter. A simulated
//! click and two counter updates show which components re-render.
//!
//! Run with: cargo run -p rivulet-core --example console
//! Set `RUST_LOG=rivulet_core=trace` to see subscriptions and fan-out.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rivulet_core::{create_effect, create_signal, create_store, ReadSignal, Store, WriteSignal};

#[derive(Debug, Clone)]
struct Profile {
    id: String,
}

struct Component {
    global_count: ReadSignal<i32>,
    profiles: Store<&'static str, Profile>,
    local_count: ReadSignal<i32>,
    set_local_count: WriteSignal<i32>,
}

impl Component {
    fn new(global_count: ReadSignal<i32>) -> Arc<Self> {
        let profiles = create_store([
            ("one", Profile { id: "one".into() }),
            ("two", Profile { id: "two".into() }),
        ]);
        let (local_count, set_local_count) = create_signal(30);

        Arc::new(Self {
            global_count,
            profiles,
            local_count,
            set_local_count,
        })
    }

    fn render(&self) -> String {
        let profile_id = self
            .profiles
            .get("one")
            .map(|profile| profile.id)
            .unwrap_or_default();

        format!(
            "The global count is {}, local count is {} and profiles.one.id is {}",
            self.global_count.get(),
            self.local_count.get(),
            profile_id
        )
    }

    fn handle_click(&self) {
        self.profiles.set("one", Profile { id: "newOne".into() });
    }
}

fn mount(label: &'static str, component: &Arc<Component>) {
    let component = Arc::clone(component);
    create_effect(move || println!("{label}: {}", component.render()));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (global_count, set_global_count) = create_signal(3);

    let first = Component::new(global_count.clone());
    let second = Component::new(global_count);
    mount("Comp #1", &first);
    mount("Comp #2", &second);

    println!("----- going to click in Comp #1 -----");
    first.handle_click();

    println!("----- going to set Comp #1's local count = 50 -----");
    first.set_local_count.set(50);

    println!("----- going to set global count = 5 -----");
    set_global_count.set(5);
}
