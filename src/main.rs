use generic_serializer::codec::binary::HEADER_LEN;
use generic_serializer::{Format, SerializationFacade, SerializerOptions};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Inventory {
    name: String,
    count: u32,
    #[serde(default)]
    tags: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init logger
    env_logger::builder().format_timestamp_secs().init();

    println!("📦 Generic Serializer - Demo");
    println!("================================\n");

    let value = Inventory {
        name: "widgets".to_string(),
        count: 42,
        tags: vec!["blue".to_string(), "small".to_string()],
    };
    let facade = SerializationFacade::<Inventory>::with_options(SerializerOptions::balanced());
    let data_dir = tempfile::tempdir()?;

    for format in Format::ALL {
        println!("🔄 Format: {format}");

        let bytes = facade.encode_to_bytes(&value, format)?;
        println!("   Encoded size: {} bytes", bytes.len());
        match format {
            Format::Xml => println!("   Document:\n{}", String::from_utf8_lossy(&bytes)),
            Format::Binary => println!("   Header: {}", hex::encode(&bytes[..HEADER_LEN])),
        }

        let text = facade.encode_to_text(&value, format)?;
        let from_text = facade.decode_from_text(&text, format)?;
        println!("   Text round-trip ok: {}", from_text == value);

        let path = data_dir
            .path()
            .join(format!("inventory.{}", format.extension()));
        facade.encode_to_path(&path, &value, format)?;
        let mut file = std::fs::File::open(&path)?;
        let from_file = facade.decode_from_stream(&mut file, format)?;
        println!("   File round-trip ok: {} ({})", from_file == value, path.display());
        println!();
    }

    println!("⚠️  Invalid selector:");
    match facade.encode_to_bytes(&value, 99u8) {
        Ok(_) => println!("   unexpectedly succeeded"),
        Err(e) => println!("   {e}"),
    }
    match facade.decode_from_text("not binary data", Format::Binary) {
        Ok(_) => println!("   unexpectedly decoded"),
        Err(e) => println!("   {e}"),
    }

    Ok(())
}
