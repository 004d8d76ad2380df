//! Resolución de parámetros de tipo a partir de filas muestreadas.
//!
//! Orden de inferencia:
//! 1. parámetros de clase desde los argumentos de clase (estructural si algún
//!    parámetro del constructor menciona el tipo; posicional si no);
//! 2. inferencia "smart": parámetros de clase aún abiertos desde los
//!    argumentos de método cuyo tipo declarado los menciona;
//! 3. parámetros de método desde los argumentos de método;
//! 4. fallback configurable para lo que siga abierto;
//! 5. validación de restricciones, acumulando todas las violaciones.
//!
//! Los generadores tipados aportan sus argumentos de tipo declarados antes de
//! mirar ningún valor.
//!
//! Sin ninguna fuente tipada queda `resolve_from_annotations`: la anotación
//! del parámetro de método i-ésimo fija el parámetro de tipo i-ésimo del
//! método (o de la clase, si el método no es genérico).

use log::warn;

use super::constraints;
use crate::config::GenericFallback;
use crate::errors::GenericResolutionError;
use crate::model::{builtins, GenericBinding, GenericParameter, ParameterMetadata, RuntimeType, TestMetadata, TestValue};

/// Lado (clase o método) de una fila ya muestreada.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedArguments<'a> {
    pub values: &'a [TestValue],
    /// Tipos declarados por un generador tipado, en orden de parámetro.
    pub declared: &'a [RuntimeType],
    /// Si es `false` los valores no participan en la inferencia (fuentes sin
    /// tipo).
    pub inferable: bool,
}

impl<'a> TypedArguments<'a> {
    pub fn new(values: &'a [TestValue], declared: &'a [RuntimeType], inferable: bool) -> Self {
        Self { values,
               declared,
               inferable }
    }
}

pub struct GenericTypeResolver<'m> {
    metadata: &'m TestMetadata,
    fallback: GenericFallback,
}

impl<'m> GenericTypeResolver<'m> {
    pub fn new(metadata: &'m TestMetadata, fallback: GenericFallback) -> Self { Self { metadata, fallback } }

    pub fn resolve(&self, class: TypedArguments<'_>, method: TypedArguments<'_>)
                   -> Result<GenericBinding, GenericResolutionError> {
        let class_md = &self.metadata.class;
        let method_md = &self.metadata.method;
        let mut binding = GenericBinding::new();

        for (i, tp) in class_md.type_parameters.iter().enumerate() {
            let inferred = class.declared
                                .get(i)
                                .cloned()
                                .or_else(|| infer_direct(tp, i, &class_md.constructor_parameters, class))
                                .or_else(|| infer_structural(tp, &method_md.parameters, method));
            self.bind(&mut binding, tp, inferred)?;
        }

        for (i, tp) in method_md.type_parameters.iter().enumerate() {
            let inferred = method.declared
                                 .get(i)
                                 .cloned()
                                 .or_else(|| infer_direct(tp, i, &method_md.parameters, method));
            self.bind(&mut binding, tp, inferred)?;
        }

        constraints::validate(class_md.type_parameters.iter().chain(&method_md.type_parameters), &binding)?;
        Ok(binding)
    }

    /// Binding a partir de las anotaciones de los parámetros de método.
    /// `None` si ningún parámetro está anotado.
    pub fn resolve_from_annotations(&self) -> Option<Result<GenericBinding, GenericResolutionError>> {
        let class_md = &self.metadata.class;
        let method_md = &self.metadata.method;
        let targets = if method_md.type_parameters.is_empty() {
            &class_md.type_parameters
        } else {
            &method_md.type_parameters
        };
        let annotated: Vec<(usize, &RuntimeType)> =
            method_md.parameters.iter().enumerate().filter_map(|(i, p)| p.type_annotation.as_ref().map(|t| (i, t))).collect();
        if annotated.is_empty() {
            return None;
        }

        let resolve = || -> Result<GenericBinding, GenericResolutionError> {
            let mut binding = GenericBinding::new();
            for (i, tp) in targets.iter().enumerate() {
                let inferred = annotated.iter().find(|(at, _)| *at == i).map(|(_, t)| (*t).clone());
                self.bind(&mut binding, tp, inferred)?;
            }
            constraints::validate(targets, &binding)?;
            Ok(binding)
        };
        Some(resolve())
    }

    fn bind(&self, binding: &mut GenericBinding, tp: &GenericParameter, inferred: Option<RuntimeType>)
            -> Result<(), GenericResolutionError> {
        match (inferred, self.fallback) {
            (Some(t), _) => binding.insert(tp.name.clone(), t),
            (None, GenericFallback::Placeholder) => {
                warn!("generic parameter '{}' of {}.{} could not be inferred; using '{}'",
                      tp.name,
                      self.metadata.class.name,
                      self.metadata.method.name,
                      builtins::OBJECT_NAME);
                binding.insert(tp.name.clone(), builtins::object());
            }
            (None, GenericFallback::Fail) => {
                return Err(GenericResolutionError::Unresolved { parameter: tp.name.clone() });
            }
        }
        Ok(())
    }
}

/// Estructural si algún parámetro declarado menciona `tp`; posicional si
/// ninguno lo hace.
fn infer_direct(tp: &GenericParameter, position: usize, parameters: &[ParameterMetadata], args: TypedArguments<'_>)
                -> Option<RuntimeType> {
    if parameters.iter().any(|p| p.ty.mentions(&tp.name)) {
        return infer_structural(tp, parameters, args);
    }
    if !args.inferable {
        return None;
    }
    args.values.get(position).and_then(TestValue::runtime_type)
}

/// Primer parámetro cuyo tipo declarado menciona `tp` y cuyo argumento
/// (no nulo) unifica con la declaración.
fn infer_structural(tp: &GenericParameter, parameters: &[ParameterMetadata], args: TypedArguments<'_>)
                    -> Option<RuntimeType> {
    if !args.inferable {
        return None;
    }
    parameters.iter()
              .zip(args.values)
              .filter(|(p, _)| p.ty.mentions(&tp.name))
              .find_map(|(p, v)| v.runtime_type().and_then(|actual| p.ty.infer(&tp.name, &actual)))
}
