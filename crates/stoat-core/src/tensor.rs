use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::shape::Shape;

// TensorDesc — Symbolic tensor descriptor
//
// A TensorDesc describes a named, typed, shaped quantity without attaching
// any computation to it. It is the currency of the whole crate: graph
// nodes produce them, layers own them as parameters, and the external
// execution engine later binds the non-virtual ones to real memory.
//
// STORAGE MODEL:
//
//   Host descriptors own a typed buffer (HostData) sized to the shape.
//   This is where parameters live between initialization and the upload
//   to device memory, which is the transfer layer's concern, not ours.
//
//   Device descriptors carry no buffer at all — only the metadata the
//   engine needs to allocate and bind them.
//
//   Virtual descriptors are intermediates that exist only inside the
//   graph; they are never bound to externally visible storage.
//
// The setters return `&mut Self` so graph-building code can chain the
// edits it performs on freshly created operation outputs:
//
//   graph.desc_mut(out)
//       .set_is_virtual(true)
//       .set_name("fc1_bias_add_out")
//       .set_data_type(DType::F32);

/// Where a descriptor's storage lives (or would live, once bound).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Host,
    Device,
}

/// Typed host-resident storage behind a descriptor.
///
/// A tagged variant per supported dtype, so every consumer dispatches
/// with an exhaustive match instead of casting raw pointers.
#[derive(Debug, Clone, PartialEq)]
pub enum HostData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
}

impl HostData {
    /// Zero-filled storage of the given dtype and element count.
    fn zeros(dtype: DType, n: usize) -> Self {
        match dtype {
            DType::F32 => HostData::F32(vec![0.0; n]),
            DType::F64 => HostData::F64(vec![0.0; n]),
            DType::I32 => HostData::I32(vec![0; n]),
        }
    }

    /// The dtype of the stored elements.
    pub fn dtype(&self) -> DType {
        match self {
            HostData::F32(_) => DType::F32,
            HostData::F64(_) => DType::F64,
            HostData::I32(_) => DType::I32,
        }
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            HostData::F32(v) => v.len(),
            HostData::F64(v) => v.len(),
            HostData::I32(v) => v.len(),
        }
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The elements as an f32 slice, if that is the stored dtype.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            HostData::F32(v) => Some(v),
            _ => None,
        }
    }

    /// The elements as an f64 slice, if that is the stored dtype.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            HostData::F64(v) => Some(v),
            _ => None,
        }
    }

    /// The elements as an i32 slice, if that is the stored dtype.
    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            HostData::I32(v) => Some(v),
            _ => None,
        }
    }
}

/// A symbolic tensor descriptor: name, dtype, shape, storage location,
/// virtuality flag, and (for host descriptors) the backing buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorDesc {
    name: String,
    dtype: DType,
    shape: Shape,
    location: Location,
    is_virtual: bool,
    data: Option<HostData>,
}

impl TensorDesc {
    /// A host-resident descriptor with zero-filled storage.
    ///
    /// This is how layer parameters and gradient accumulators start out:
    /// materialized on the host, waiting to be initialized and uploaded.
    pub fn host(name: impl Into<String>, shape: impl Into<Shape>, dtype: DType) -> Self {
        let shape = shape.into();
        let data = HostData::zeros(dtype, shape.elem_count());
        TensorDesc {
            name: name.into(),
            dtype,
            shape,
            location: Location::Host,
            is_virtual: false,
            data: Some(data),
        }
    }

    /// A device-resident descriptor. Carries no host buffer; the external
    /// engine allocates and binds it.
    pub fn device(name: impl Into<String>, shape: impl Into<Shape>, dtype: DType) -> Self {
        TensorDesc {
            name: name.into(),
            dtype,
            shape: shape.into(),
            location: Location::Device,
            is_virtual: false,
            data: None,
        }
    }

    /// The descriptor a graph operation mints for its output. Unnamed
    /// until the builder names it; never host-materialized.
    pub(crate) fn output(shape: Shape, dtype: DType) -> Self {
        TensorDesc {
            name: String::new(),
            dtype,
            shape,
            location: Location::Device,
            is_virtual: false,
            data: None,
        }
    }

    /// The graph-tensor-attribute form of this descriptor: identical
    /// metadata, no storage. Layers call this to reference a parameter
    /// from a graph node without handing the graph their buffer.
    pub fn attribute(&self) -> TensorDesc {
        TensorDesc {
            name: self.name.clone(),
            dtype: self.dtype,
            shape: self.shape.clone(),
            location: self.location,
            is_virtual: false,
            data: None,
        }
    }

    // Accessors

    /// The symbolic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element data type.
    pub fn data_type(&self) -> DType {
        self.dtype
    }

    /// The shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The dimension sizes as a slice (shortcut for `shape().dims()`).
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Total number of elements.
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Whether the storage is host-resident.
    pub fn is_on_host(&self) -> bool {
        self.location == Location::Host
    }

    /// Whether this is a graph-internal intermediate that will never be
    /// bound to externally visible storage.
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    // Chainable setters — each returns the descriptor itself and is
    // idempotent, so repeated application is harmless.

    /// Set the symbolic name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Retag the element data type.
    ///
    /// This edits the descriptor only — it never converts host storage.
    /// It exists so builders can force an operation output to a compute
    /// dtype that differs from an operand's storage dtype.
    pub fn set_data_type(&mut self, dtype: DType) -> &mut Self {
        self.dtype = dtype;
        self
    }

    /// Replace the declared shape.
    pub fn set_dim(&mut self, shape: impl Into<Shape>) -> &mut Self {
        self.shape = shape.into();
        self
    }

    /// Mark (or unmark) this descriptor as a graph-internal intermediate.
    pub fn set_is_virtual(&mut self, is_virtual: bool) -> &mut Self {
        self.is_virtual = is_virtual;
        self
    }

    // Host storage access

    /// The host buffer, if this descriptor is host-resident.
    pub fn host_data(&self) -> Option<&HostData> {
        self.data.as_ref()
    }

    /// Mutable access to the host buffer.
    ///
    /// Errors with [`Error::NotOnHost`] if the storage is not
    /// host-resident — the precondition for any host-side fill.
    pub fn host_data_mut(&mut self) -> Result<&mut HostData> {
        match self.data.as_mut() {
            Some(data) => Ok(data),
            None => Err(Error::NotOnHost {
                name: self.name.clone(),
            }),
        }
    }
}
