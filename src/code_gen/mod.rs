pub mod capacitor;
pub mod code_gen;
pub mod cypress;
pub mod gen_iface;
pub mod ionic;
pub mod jest;
pub mod lint;
pub mod project;
pub mod react;
pub mod template;
