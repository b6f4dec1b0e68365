// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

#[cfg(target_arch = "wasm32")]
pub fn main() {
    use leptos::prelude::*;
    use wardrobe_frontend::AppShell;

    console_error_panic_hook::set_once();
    mount_to_body(AppShell);
}

// 原生目标只用于运行测试
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
