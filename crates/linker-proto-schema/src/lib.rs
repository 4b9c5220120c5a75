mod convert;

pub mod linker {
    pub mod v1 {
        tonic::include_proto!("linker.v1");
    }
}

pub mod v1 {
    pub use crate::linker::v1::*;
}
