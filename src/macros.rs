/// Declares a zero-cost proxy for a memory mapped register block.
///
/// The proxy carries the address of its register block and the core profile
/// it was created for. It dereferences to the register block.
macro_rules! peripheral {
    ($(#[$attr:meta])* $name:ident, $block:path, $address:expr) => {
        $(#[$attr])*
        pub struct $name<P: crate::profile::Profile> {
            ptr: *const $block,
            _profile: core::marker::PhantomData<P>,
        }

        unsafe impl<P: crate::profile::Profile> Send for $name<P> {}

        impl<P: crate::profile::Profile> $name<P> {
            /// Architectural base address of the register block.
            pub const PTR: *const $block = $address as usize as *const _;

            /// Creates the proxy for the architectural address.
            ///
            /// # Safety
            ///
            /// Must only be called once per peripheral, or concurrent
            /// accesses must be otherwise synchronized.
            #[inline]
            pub const unsafe fn steal() -> Self {
                Self::from_ptr(Self::PTR)
            }

            /// Creates a proxy for a register block at an arbitrary address.
            ///
            /// # Safety
            ///
            /// `ptr` must point to a valid register block that outlives the
            /// proxy.
            #[inline]
            pub const unsafe fn from_ptr(ptr: *const $block) -> Self {
                Self {
                    ptr,
                    _profile: core::marker::PhantomData,
                }
            }

            /// Returns the address of the register block.
            #[inline]
            pub const fn ptr(&self) -> *const $block {
                self.ptr
            }
        }

        impl<P: crate::profile::Profile> core::ops::Deref for $name<P> {
            type Target = $block;

            #[inline(always)]
            fn deref(&self) -> &Self::Target {
                unsafe { &*self.ptr }
            }
        }

        impl<P: crate::profile::Profile> core::fmt::Debug for $name<P> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("ptr", &self.ptr)
                    .finish()
            }
        }
    };
}

/// Implements read accessors for single bits of a word backed register value.
macro_rules! bit_accessors {
    ($ty:ident { $($(#[$attr:meta])* $fn:ident: $bit:expr),* $(,)? }) => {
        impl $ty {
            $(
                $(#[$attr])*
                #[inline]
                pub fn $fn(self) -> bool {
                    self.bits & (1 << $bit) != 0
                }
            )*
        }
    };
}
