//! Loading a vertex/fragment WGSL pair and looking up its inputs by name.
//!
//! Each stage lives in its own file. [`ProgramInterface::reflect`] parses both with naga
//! and records, by name:
//!
//! - vertex inputs (`@location(n)` arguments or struct members of the vertex entry point)
//! - fragment outputs (`@location(n)` members of the fragment result struct)
//! - uniforms (`var<uniform>` globals with their `@group`/`@binding`)
//!
//! Lookups return `Option` rather than a `-1` sentinel. The position attribute and the
//! fragment output are required when the program is loaded; everything else is up to
//! the caller.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShaderError;

/// Size of a `mat4x4<f32>` in bytes.
pub const MAT4_SIZE: u32 = 64;

/// Where a uniform lives in the pipeline layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    /// Size of the uniform's type in bytes.
    pub size: u32,
}

/// Reflected inputs and outputs of a vertex/fragment pair. No GPU needed.
#[derive(Clone, Debug, Default)]
pub struct ProgramInterface {
    pub vertex_entry: String,
    pub fragment_entry: String,
    attributes: BTreeMap<String, u32>,
    outputs: BTreeMap<String, u32>,
    uniforms: BTreeMap<String, UniformLocation>,
    position_location: u32,
    output_location: u32,
}

impl ProgramInterface {
    /// Reflects a vertex and a fragment source.
    ///
    /// Fails if either source does not parse, lacks an entry point for its stage, or
    /// does not declare `position_attribute` / `fragment_output`.
    pub fn reflect(
        vertex_path: &Path,
        vertex_source: &str,
        position_attribute: &str,
        fragment_path: &Path,
        fragment_source: &str,
        fragment_output: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = parse(vertex_path, vertex_source)?;
        let fragment = parse(fragment_path, fragment_source)?;

        let vertex_entry = find_entry(&vertex, naga::ShaderStage::Vertex).ok_or_else(|| {
            ShaderError::MissingEntryPoint {
                path: vertex_path.to_path_buf(),
                stage: "vertex",
            }
        })?;
        let fragment_entry = find_entry(&fragment, naga::ShaderStage::Fragment).ok_or_else(|| {
            ShaderError::MissingEntryPoint {
                path: fragment_path.to_path_buf(),
                stage: "fragment",
            }
        })?;

        let mut attributes = BTreeMap::new();
        for argument in &vertex_entry.function.arguments {
            collect_locations(
                &vertex,
                argument.name.as_deref(),
                argument.ty,
                argument.binding.as_ref(),
                &mut attributes,
            );
        }

        let mut outputs = BTreeMap::new();
        if let Some(result) = &fragment_entry.function.result {
            collect_locations(&fragment, None, result.ty, result.binding.as_ref(), &mut outputs);
        }

        let mut uniforms = BTreeMap::new();
        collect_uniforms(&vertex, &mut uniforms);
        collect_uniforms(&fragment, &mut uniforms);

        let position_location = *attributes
            .get(position_attribute)
            .ok_or_else(|| ShaderError::MissingAttribute(position_attribute.to_string()))?;

        // an unnamed `-> @location(0) vec4<f32>` result satisfies any output name
        let output_location = match outputs.get(fragment_output) {
            Some(location) => *location,
            None => match fragment_entry.function.result.as_ref().and_then(|r| r.binding.as_ref()) {
                Some(naga::Binding::Location { location, .. }) => *location,
                _ => return Err(ShaderError::MissingOutput(fragment_output.to_string())),
            },
        };

        Ok(Self {
            vertex_entry: vertex_entry.name.clone(),
            fragment_entry: fragment_entry.name.clone(),
            attributes,
            outputs,
            uniforms,
            position_location,
            output_location,
        })
    }

    /// Shader location of a vertex input, if declared.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }

    /// Location of a named fragment output, if declared.
    pub fn output_location(&self, name: &str) -> Option<u32> {
        self.outputs.get(name).copied()
    }

    /// Group, binding and size of a uniform, if declared in either stage.
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(name).copied()
    }

    /// Location of the required position attribute.
    pub fn position_location(&self) -> u32 {
        self.position_location
    }

    /// Color target index of the required fragment output.
    pub fn color_target(&self) -> u32 {
        self.output_location
    }
}

/// A loaded shader program: compiled GPU modules plus their reflected interface.
pub struct ShaderProgram {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
    pub interface: ProgramInterface,
}

impl ShaderProgram {
    /// Reads both stages from disk, checks the required names, and creates the modules.
    pub fn load(
        device: &wgpu::Device,
        vertex_path: impl AsRef<Path>,
        position_attribute: &str,
        fragment_path: impl AsRef<Path>,
        fragment_output: &str,
    ) -> Result<Self, ShaderError> {
        let vertex_path = vertex_path.as_ref().to_path_buf();
        let fragment_path = fragment_path.as_ref().to_path_buf();
        let vertex_source = read_source(&vertex_path)?;
        let fragment_source = read_source(&fragment_path)?;

        let interface = ProgramInterface::reflect(
            &vertex_path,
            &vertex_source,
            position_attribute,
            &fragment_path,
            &fragment_source,
            fragment_output,
        )?;

        let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
        });
        let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
        });

        log::info!(
            "Loaded shader program '{}' + '{}'",
            vertex_path.display(),
            fragment_path.display()
        );

        Ok(Self {
            vertex,
            fragment,
            interface,
        })
    }

    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.interface.attribute_location(name)
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.interface.uniform_location(name)
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse(path: &Path, source: &str) -> Result<naga::Module, ShaderError> {
    naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        path: path.to_path_buf(),
        message: e.emit_to_string(source),
    })
}

fn find_entry(module: &naga::Module, stage: naga::ShaderStage) -> Option<&naga::EntryPoint> {
    module.entry_points.iter().find(|entry| entry.stage == stage)
}

/// Records `name -> location` for a binding, descending into struct members.
fn collect_locations(
    module: &naga::Module,
    name: Option<&str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeMap<String, u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            if let Some(name) = name {
                out.insert(name.to_string(), *location);
            }
        }
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(
                        module,
                        member.name.as_deref(),
                        member.ty,
                        member.binding.as_ref(),
                        out,
                    );
                }
            }
        }
        // builtins
        _ => {}
    }
}

fn collect_uniforms(module: &naga::Module, out: &mut BTreeMap<String, UniformLocation>) {
    for (_, global) in module.global_variables.iter() {
        if global.space != naga::AddressSpace::Uniform {
            continue;
        }
        let (Some(name), Some(binding)) = (&global.name, &global.binding) else {
            continue;
        };
        let size = module.types[global.ty].inner.size(module.to_ctx());
        out.insert(
            name.clone(),
            UniformLocation {
                group: binding.group,
                binding: binding.binding,
                size,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERT: &str = include_str!("../shaders/sphere_vert.wgsl");
    const FRAG: &str = include_str!("../shaders/sphere_frag.wgsl");

    fn reflect(vert: &str, frag: &str) -> Result<ProgramInterface, ShaderError> {
        ProgramInterface::reflect(
            Path::new("vert.wgsl"),
            vert,
            "pv",
            Path::new("frag.wgsl"),
            frag,
            "fc",
        )
    }

    #[test]
    fn shipped_shaders_expose_sample_names() {
        let program = reflect(VERT, FRAG).unwrap();

        assert_eq!(program.position_location(), 0);
        assert_eq!(program.attribute_location("pv"), Some(0));
        assert_eq!(program.attribute_location("nv"), Some(1));
        assert_eq!(program.output_location("fc"), Some(0));
        assert_eq!(program.color_target(), 0);

        for (name, binding) in [("mw", 0), ("mc", 1), ("mg", 2)] {
            assert_eq!(
                program.uniform_location(name),
                Some(UniformLocation {
                    group: 0,
                    binding,
                    size: MAT4_SIZE
                })
            );
        }
    }

    #[test]
    fn unknown_names_are_none() {
        let program = reflect(VERT, FRAG).unwrap();

        assert_eq!(program.attribute_location("uv"), None);
        assert_eq!(program.uniform_location("light"), None);
    }

    #[test]
    fn missing_position_attribute_fails() {
        let vert = "@vertex fn vs(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> { return vec4<f32>(p, 1.0); }";
        let err = reflect(vert, FRAG).unwrap_err();
        assert!(matches!(err, ShaderError::MissingAttribute(name) if name == "pv"));
    }

    #[test]
    fn bare_fragment_output_is_accepted() {
        let vert = "@vertex fn vs(@location(3) pv: vec3<f32>) -> @builtin(position) vec4<f32> { return vec4<f32>(pv, 1.0); }";
        let frag = "@fragment fn fs() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let program = reflect(vert, frag).unwrap();

        assert_eq!(program.position_location(), 3);
        assert_eq!(program.attribute_location("nv"), None);
        assert_eq!(program.color_target(), 0);
        assert_eq!(program.vertex_entry, "vs");
        assert_eq!(program.fragment_entry, "fs");
    }

    #[test]
    fn missing_fragment_stage_fails() {
        let err = reflect(VERT, VERT).unwrap_err();
        assert!(matches!(err, ShaderError::MissingEntryPoint { stage: "fragment", .. }));
    }

    #[test]
    fn parse_errors_are_reported() {
        let err = reflect("this is not wgsl", FRAG).unwrap_err();
        assert!(matches!(err, ShaderError::Parse { .. }));
    }
}
