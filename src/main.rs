use ringfield::prelude::*;

fn main() {
    env_logger::init();

    let sketch = Sketch::new()
        .with_field(
            FieldConfig::new(1.0, 2.0)
                .with_color(color_from_hex("#f7b373").expect("valid hex"))
                .with_sprite_size(1.0)
                .with_amplitude(1.0),
        )
        .with_field(
            FieldConfig::new(1.0, 2.0)
                .with_color(color_from_hex("#88b3ce").expect("valid hex"))
                .with_sprite_size(0.5)
                .with_amplitude(3.0),
        );

    if let Err(e) = sketch.run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
