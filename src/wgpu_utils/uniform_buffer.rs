// src/wgpu_utils/uniform_buffer.rs - per-draw uniforms addressed by dynamic offsets
use std::marker::PhantomData;

/// Uniform buffer holding one `Content` slot per draw call.
///
/// Slots sit `stride` bytes apart, where `stride` is `size_of::<Content>()` rounded up to
/// the device's `min_uniform_buffer_offset_alignment`. The buffer grows when a frame needs
/// more slots than it has.
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        let pos = type_name.rfind(':').unwrap_or(0);
        if pos > 0 {
            &type_name[(pos + 1)..]
        } else {
            type_name
        }
    }

    fn content_size() -> u64 {
        std::mem::size_of::<Content>() as u64
    }

    /// Layout entry for binding 0 of a bind group using dynamic offsets.
    pub fn layout_entry(visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(Self::content_size()),
            },
            count: None,
        }
    }

    /// Create a buffer with room for `capacity` slots
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, capacity: usize) -> Self {
        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = Self::content_size().div_ceil(alignment) * alignment;
        let capacity = capacity.max(1);
        let (buffer, bind_group) = Self::allocate(device, layout, stride, capacity);

        Self {
            buffer,
            bind_group,
            stride,
            capacity,
            staging: Vec::new(),
            content_type: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformBuffer: {}", Self::name())),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("DynamicUniformBindGroup: {}", Self::name())),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(Self::content_size()),
                }),
            }],
        });

        (buffer, bind_group)
    }

    /// Uploads one slot per entry of `contents`, growing the buffer if needed
    pub fn write_all(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        queue: &wgpu::Queue,
        contents: &[Content],
    ) {
        if contents.is_empty() {
            return;
        }

        if contents.len() > self.capacity {
            let capacity = contents.len().next_power_of_two();
            log::debug!(
                "growing {} from {} to {} slots",
                Self::name(),
                self.capacity,
                capacity
            );
            let (buffer, bind_group) = Self::allocate(device, layout, self.stride, capacity);
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = capacity;
        }

        let stride = self.stride as usize;
        self.staging.clear();
        self.staging.resize(stride * contents.len(), 0);
        for (slot, content) in self.staging.chunks_exact_mut(stride).zip(contents) {
            let bytes = bytemuck::bytes_of(content);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    /// Dynamic offset of slot `index`
    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (self.stride * index as u64) as wgpu::DynamicOffset
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
