use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerWidth {
    P32,
    #[default]
    P64,
}

impl PointerWidth {
    pub fn bytes(self) -> u64 {
        match self {
            PointerWidth::P32 => 4,
            PointerWidth::P64 => 8,
        }
    }
}

impl FromStr for PointerWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "32" => Ok(PointerWidth::P32),
            "64" => Ok(PointerWidth::P64),
            _ => Err(format!("unsupported pointer width '{s}', expected 32 or 64")),
        }
    }
}

/// Everything about the target that layout depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Target {
    pub pointer_width: PointerWidth,
}

impl Target {
    pub fn new(pointer_width: PointerWidth) -> Target {
        Target { pointer_width }
    }

    pub fn pointer_size(&self) -> u64 {
        self.pointer_width.bytes()
    }
}
