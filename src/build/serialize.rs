//! Depth-first serialization of an [`Instance`] tree into document text.

use crate::build::codec::escape;
use crate::build::instance::{Instance, Property};
use crate::build::writer::ModelWriter;
use crate::config;

/// Hands out referent ids for one assembled document.
///
/// Ids start at 1 and are acquired in emission order (depth-first pre-order),
/// so one run over `n` nodes uses exactly `1..=n`. The counter is threaded
/// through the call chain rather than living in a global, so concurrent
/// compilations in one process cannot interfere.
#[derive(Debug, Default)]
pub struct ReferentCounter {
    assigned: u64,
}

impl ReferentCounter {
    pub fn new() -> Self {
        ReferentCounter { assigned: 0 }
    }

    fn next_id(&mut self) -> u64 {
        self.assigned += 1;
        self.assigned
    }

    /// How many ids this counter has handed out.
    pub fn assigned(&self) -> u64 {
        self.assigned
    }
}

/// Emit `instance` and its subtree as `Item` elements at the writer's current
/// indent.
pub fn serialize_instance(instance: &Instance, writer: &mut ModelWriter, referents: &mut ReferentCounter) {
    let id = referents.next_id();
    writer.indent(0).write(format_args!(
        "<Item class=\"{}\" referent=\"{}{}\">",
        escape(instance.class_name()),
        config::REFERENT_PREFIX,
        id
    ));

    writer.indent(1).write("<Properties>");
    let mut delta = 1;
    for (name, property) in instance.properties() {
        writer.indent(delta).write(property_element(name, property));
        delta = 0;
    }
    let closing_delta = if instance.property_count() > 0 { -1 } else { 0 };
    writer.indent(closing_delta).write("</Properties>");

    for child in &instance.children {
        serialize_instance(child, writer, referents);
    }

    writer.indent(-1).write("</Item>");
}

fn property_element(name: &str, property: &Property) -> String {
    let tag = property.type_tag();
    let value = match property {
        Property::String(text) | Property::ProtectedString(text) => escape(text),
        Property::Bool(value) => value.to_string(),
        Property::Int(value) => value.to_string(),
    };
    format!("<{tag} name=\"{}\">{value}</{tag}>", escape(name))
}

/// Serialize `root` and wrap it in the fixed document envelope.
pub fn assemble(root: &Instance) -> String {
    let mut writer = ModelWriter::new();
    let mut referents = ReferentCounter::new();
    serialize_instance(root, &mut writer, &mut referents);
    format!(
        "<roblox xmlns:xmime=\"http://www.w3.org/2005/05/xmlmime\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:noNamespaceSchemaLocation=\"http://www.roblox.com/roblox.xsd\" \
         version=\"{}\">\n{}</roblox>\n",
        config::MODEL_FORMAT_VERSION,
        writer.render()
    )
}
