fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_prost_build::compile_protos("proto/linker/v1/linker.proto")?;
    Ok(())
}
